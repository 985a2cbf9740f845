/// The habit store: single owner of all habits and their completions
///
/// Every command goes through validation, mutates the in-memory list, and
/// then persists the whole list. Commands return a `Result`, and the message
/// of the latest failure is also kept in one slot (`last_error`) that the
/// next successful command clears, so a UI can always render the most
/// recent problem.
///
/// Commands are split by family: `create` (add), `log` (toggle completion),
/// `archive` (archive/delete) and `status` (read-only views).

pub mod archive;
pub mod create;
pub mod log;
pub mod status;

pub use log::ToggleCompletionParams;
pub use status::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{DomainError, Habit, HabitId, MAX_HABITS};
use crate::storage::{HabitStorage, StorageError};

/// Broad category of a store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A habit or completion limit was reached
    Capacity,
    /// A field constraint was violated
    Validation,
    /// The habit id does not exist
    NotFound,
    /// Missing or malformed command arguments
    InvalidInput,
    /// Writing the snapshot failed
    Persistence,
}

/// Errors reported by store commands
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("You can't create more than {} habits.", MAX_HABITS)]
    HabitLimit,

    #[error("A habit with this name already exists.")]
    DuplicateName,

    #[error("Habit not found.")]
    NotFound { habit_id: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Failed to save habits. Please try again.")]
    Persistence(#[from] StorageError),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::HabitLimit => ErrorKind::Capacity,
            StoreError::DuplicateName => ErrorKind::Validation,
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            StoreError::Domain(DomainError::CompletionLimit) => ErrorKind::Capacity,
            StoreError::Domain(DomainError::Validation(_)) => ErrorKind::Validation,
            StoreError::Domain(_) => ErrorKind::InvalidInput,
            StoreError::Persistence(_) => ErrorKind::Persistence,
        }
    }
}

/// Source of "now" for every timestamp and date comparison
pub type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Owner of the habit list
pub struct HabitStore<S: HabitStorage> {
    storage: S,
    habits: Vec<Habit>,
    last_error: Option<String>,
    clock: Clock,
}

impl<S: HabitStorage> HabitStore<S> {
    /// Load the habit list from `storage`
    pub fn open(storage: S) -> Result<Self, StorageError> {
        Self::with_clock(storage, Utc::now)
    }

    /// Load the habit list, reading the current time from `clock`
    pub fn with_clock(
        storage: S,
        clock: impl Fn() -> DateTime<Utc> + 'static,
    ) -> Result<Self, StorageError> {
        let habits = storage.load()?;
        tracing::info!("Habit store opened with {} habits", habits.len());

        Ok(Self {
            storage,
            habits,
            last_error: None,
            clock: Box::new(clock),
        })
    }

    /// All habits in insertion order, archived ones included
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    /// Habits shown in active views
    pub fn active_habits(&self) -> impl Iterator<Item = &Habit> {
        self.habits.iter().filter(|h| !h.archived)
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.position(habit_id).map(|i| &self.habits[i])
    }

    /// Message of the most recent failure, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn position(&self, habit_id: &str) -> Option<usize> {
        let habit_id = HabitId::parse(habit_id)?;
        self.habits.iter().position(|h| h.id == habit_id)
    }

    /// Record a command's outcome and persist after a successful mutation
    ///
    /// A failed save is logged and reported through `last_error` but leaves
    /// the in-memory change and the command's `Ok` result in place.
    fn finish<T>(&mut self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        match &result {
            Ok(_) => {
                self.last_error = None;
                if let Err(e) = self.storage.save(&self.habits) {
                    tracing::error!("Error saving habits: {}", e);
                    self.last_error = Some(StoreError::Persistence(e).to_string());
                }
            }
            Err(e) => {
                tracing::debug!("Store command rejected: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
        result
    }
}
