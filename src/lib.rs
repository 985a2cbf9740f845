/// Public library interface for the habit heatmap core
///
/// This module exports the habit store, the domain types it manages, the
/// storage backends it persists through and the calendar grid builder.

use thiserror::Error;

pub mod analytics;
pub mod domain;
pub mod storage;
pub mod store;

// Re-export public modules and types
pub use analytics::{CalendarCell, CalendarGrid, CalendarWeek, ColorIntensity, IntensityBand, MonthLabel};
pub use domain::*;
pub use storage::{HabitStorage, MemoryStorage, SqliteStorage, StorageError};
pub use store::{Clock, ErrorKind, HabitStore, HabitSummary, StatusResponse, StoreError, ToggleCompletionParams};

/// Errors that can occur while running the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("{0}")]
    Store(#[from] store::StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
