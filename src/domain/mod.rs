/// Domain module containing core business logic and data types
///
/// This module defines the core entities (Habit, Completion, HabitStats) and
/// their validation rules. These types represent the fundamental concepts in
/// our habit tracking system.

pub mod habit;
pub mod completion;
pub mod stats;
pub mod types;
pub mod validation;

// Re-export public types for easy access
pub use habit::*;
pub use completion::*;
pub use stats::*;
pub use types::*;
pub use validation::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(ValidationError),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Cannot log habits for future dates")]
    FutureDate,

    #[error("Maximum number of completions reached for this habit.")]
    CompletionLimit,

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::Validation(err)
    }
}
