/// Core types and enums used throughout the domain layer
///
/// This module defines the fundamental types like HabitId, Frequency and Target
/// that are used by Habit, Completion, and the analytics built on top of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a habit
///
/// Identifiers are opaque strings. New habits get a random UUID, but records
/// loaded from older snapshots keep whatever id they were saved with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier (useful when loading stored data)
    ///
    /// Returns None for blank input, which is never a valid id.
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a habit is meant to be performed
///
/// The frequency is recorded on every habit and used as the period of a
/// target, but streaks and completion rates always assume a daily cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every single day
    #[default]
    Daily,
    /// Once per week
    Weekly,
    /// Once per month
    Monthly,
}

impl Frequency {
    /// Lowercase name used in storage and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// Parse a frequency name, ignoring case and surrounding whitespace
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional goal for quantity-based habits (e.g. 20 pages per day)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// The amount to reach within one period
    pub value: f64,
    /// The period the value applies to
    pub period: Frequency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_habit_id_parse() {
        assert!(HabitId::parse("").is_none());
        assert!(HabitId::parse("   ").is_none());

        let legacy = HabitId::parse("1700000000000-abc123def").unwrap();
        assert_eq!(legacy.as_str(), "1700000000000-abc123def");
        assert_ne!(HabitId::new(), HabitId::new());
    }

    #[test]
    fn test_frequency_round_trip_names() {
        assert_eq!(Frequency::parse(" Weekly "), Some(Frequency::Weekly));
        assert_eq!(Frequency::parse("yearly"), None);
        assert_eq!(serde_json::to_string(&Frequency::Monthly).unwrap(), "\"monthly\"");
    }
}
