/// Field-level validation for habit drafts
///
/// Validation never mutates anything. It returns every violated rule, tagged
/// with the field it belongs to, in field declaration order so callers that
/// only show one message can take the first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::HabitDraft;

/// Maximum number of habits a store may hold
pub const MAX_HABITS: usize = 100;
/// Maximum length of a habit name, in characters
pub const MAX_NAME_LENGTH: usize = 50;
/// Maximum length of a habit description, in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
/// Maximum length of a quantity unit, in characters
pub const MAX_UNIT_LENGTH: usize = 20;
/// Maximum number of completions a single habit may hold
pub const MAX_COMPLETIONS_PER_HABIT: usize = 1000;

/// The habit field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HabitField {
    Name,
    Description,
    Unit,
    Target,
}

impl HabitField {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitField::Name => "name",
            HabitField::Description => "description",
            HabitField::Unit => "unit",
            HabitField::Target => "target",
        }
    }
}

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: HabitField,
    pub message: String,
}

impl ValidationError {
    fn new(field: HabitField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a habit draft against the field rules
///
/// Rules, in order: name required and at most 50 characters; description at
/// most 200 characters; unit required when tracking quantity and at most 20
/// characters; target value strictly positive.
pub fn validate_habit(draft: &HabitDraft) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push(ValidationError::new(HabitField::Name, "Name is required"));
    } else if name.chars().count() > MAX_NAME_LENGTH {
        errors.push(ValidationError::new(
            HabitField::Name,
            format!("Name cannot be longer than {} characters", MAX_NAME_LENGTH),
        ));
    }

    if let Some(description) = &draft.description {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(ValidationError::new(
                HabitField::Description,
                format!("Description cannot be longer than {} characters", MAX_DESCRIPTION_LENGTH),
            ));
        }
    }

    let unit = draft.unit.as_deref().map(str::trim).unwrap_or("");
    if draft.track_quantity && unit.is_empty() {
        errors.push(ValidationError::new(
            HabitField::Unit,
            "Unit is required when tracking quantity",
        ));
    } else if unit.chars().count() > MAX_UNIT_LENGTH {
        errors.push(ValidationError::new(
            HabitField::Unit,
            format!("Unit cannot be longer than {} characters", MAX_UNIT_LENGTH),
        ));
    }

    if let Some(target) = &draft.target {
        // NaN fails this comparison too
        if !(target.value > 0.0) || !target.value.is_finite() {
            errors.push(ValidationError::new(
                HabitField::Target,
                "Target value must be greater than 0",
            ));
        }
    }

    errors
}
