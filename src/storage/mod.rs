/// Storage layer for persisting habit data
///
/// The store persists its whole habit list after every change and reads it
/// back once at startup. This module defines that contract, the versioned
/// snapshot format, and the backends that implement it.

pub mod memory;
pub mod migrations;
pub mod snapshot;
pub mod sqlite;

// Re-export the main storage types
pub use memory::*;
pub use snapshot::*;
pub use sqlite::*;

use thiserror::Error;
use crate::domain::Habit;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Trait defining the persistence interface for the habit list
///
/// Backends only move whole snapshots; all invariants are enforced by the
/// store before `save` is called.
pub trait HabitStorage {
    /// Load every stored habit, upgrading older records
    ///
    /// Missing or unreadable data yields an empty list rather than an error;
    /// errors are reserved for the backend itself failing.
    fn load(&self) -> Result<Vec<Habit>, StorageError>;

    /// Replace the stored habit list with `habits`
    fn save(&self, habits: &[Habit]) -> Result<(), StorageError>;
}

/// Borrowed storage, so callers can keep inspecting the backend they lent out
impl<S: HabitStorage + ?Sized> HabitStorage for &S {
    fn load(&self) -> Result<Vec<Habit>, StorageError> {
        (**self).load()
    }

    fn save(&self, habits: &[Habit]) -> Result<(), StorageError> {
        (**self).save(habits)
    }
}
