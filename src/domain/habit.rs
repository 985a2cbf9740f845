/// Habit entity and related functionality
///
/// This module defines the core Habit struct that represents a user's habit
/// they want to track, the draft used to create one, and the completion
/// toggling that keeps one entry per calendar date.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{
    validate_habit, Completion, DomainError, Frequency, HabitId, Target, MAX_COMPLETIONS_PER_HABIT,
};

/// Color given to habits created without one
pub const DEFAULT_COLOR: &str = "#1976d2";

/// A habit represents something the user wants to do regularly
///
/// This is the core entity in our system. Each habit owns its completion
/// history; statistics and calendar grids are always derived from it and
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name, unique among habits ignoring case
    pub name: String,
    /// Free-form description, possibly empty
    pub description: String,
    /// How often this habit should be performed
    pub frequency: Frequency,
    /// Presentation color (e.g. "#1976d2")
    pub color: String,
    /// Whether completions carry a numeric quantity
    pub track_quantity: bool,
    /// Unit of the quantity, present exactly when `track_quantity` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Optional goal for quantity-based habits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    /// Completion history in insertion order
    pub completions: Vec<Completion>,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Bumped on every change to the habit or its completions
    pub updated_at: DateTime<Utc>,
    /// Archived habits are kept but hidden from active views
    pub archived: bool,
}

/// The user-supplied part of a new habit
///
/// Everything except the name may be omitted when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitDraft {
    pub name: String,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub color: Option<String>,
    pub track_quantity: bool,
    pub unit: Option<String>,
    pub target: Option<Target>,
}

/// What a call to [`Habit::toggle_completion`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A completion was added for the date
    Logged,
    /// The existing completion for the date was removed
    Unlogged,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// Fails with the first validation error. On success the name and unit
    /// are trimmed, the unit is dropped unless quantity is tracked, and
    /// missing color/frequency get their defaults.
    pub fn new(draft: HabitDraft, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if let Some(error) = validate_habit(&draft).into_iter().next() {
            return Err(error.into());
        }

        let unit = if draft.track_quantity {
            draft.unit.map(|u| u.trim().to_string())
        } else {
            None
        };

        Ok(Self {
            id: HabitId::new(),
            name: draft.name.trim().to_string(),
            description: draft.description.unwrap_or_default(),
            frequency: draft.frequency.unwrap_or_default(),
            color: draft
                .color
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            track_quantity: draft.track_quantity,
            unit,
            target: draft.target,
            completions: Vec::new(),
            created_at: now,
            updated_at: now,
            archived: false,
        })
    }

    /// Check whether this habit's name matches another, ignoring case
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// The completion logged for a date, if any
    pub fn completion_on(&self, date: NaiveDate) -> Option<&Completion> {
        self.completions.iter().find(|c| c.date == date)
    }

    /// Check whether the habit was completed on a date
    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_on(date).is_some()
    }

    /// Log or un-log the habit for a date
    ///
    /// An existing completion for `date` is removed. Otherwise a new one is
    /// appended, unless the habit already holds the maximum number of
    /// completions. The quantity is kept only for quantity-tracking habits.
    /// Either way `updated_at` is set to `now`.
    pub fn toggle_completion(
        &mut self,
        date: NaiveDate,
        quantity: Option<f64>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ToggleOutcome, DomainError> {
        if let Some(index) = self.completions.iter().position(|c| c.date == date) {
            self.completions.remove(index);
            self.updated_at = now;
            return Ok(ToggleOutcome::Unlogged);
        }

        if self.completions.len() >= MAX_COMPLETIONS_PER_HABIT {
            return Err(DomainError::CompletionLimit);
        }

        let quantity = if self.track_quantity { quantity } else { None };
        let completion = Completion::new(date, quantity, notes, now)?;
        self.completions.push(completion);
        self.updated_at = now;
        Ok(ToggleOutcome::Logged)
    }

    /// Hide the habit from active views without deleting it
    pub fn archive(&mut self, now: DateTime<Utc>) {
        self.archived = true;
        self.updated_at = now;
    }

    /// Highest quantity across all completions, if any carries one
    pub fn max_quantity(&self) -> Option<f64> {
        self.completions
            .iter()
            .filter_map(|c| c.quantity)
            .fold(None, |max, q| Some(max.map_or(q, |m: f64| m.max(q))))
    }

    /// Unit label for display, falling back to "units"
    pub fn unit_label(&self) -> &str {
        self.unit.as_deref().unwrap_or("units")
    }
}

impl From<&Habit> for HabitDraft {
    fn from(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            description: Some(habit.description.clone()),
            frequency: Some(habit.frequency),
            color: Some(habit.color.clone()),
            track_quantity: habit.track_quantity,
            unit: habit.unit.clone(),
            target: habit.target,
        }
    }
}
