/// Completion entity for tracking when a habit was done
///
/// This module defines the Completion struct that represents a single day a
/// habit was performed, with an optional quantity and notes.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::DomainError;

/// A record of completing a habit on a specific day
///
/// The `date` is the natural key: a habit holds at most one completion per
/// date. `completed_at` records when the entry was made, which may be well
/// after the day being logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    /// Which day this completion is for
    pub date: NaiveDate,
    /// Amount achieved, only for habits that track quantity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    /// User's notes about this completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// When this completion was recorded
    pub completed_at: DateTime<Utc>,
}

impl Completion {
    /// Create a new completion with validation
    ///
    /// `now` is the moment of logging; the date may not be later than the
    /// calendar day of `now`. Notes are trimmed and dropped when blank.
    pub fn new(
        date: NaiveDate,
        quantity: Option<f64>,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::validate_date(&date, now.date_naive())?;
        Self::validate_quantity(&quantity)?;

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            date,
            quantity,
            notes,
            completed_at: now,
        })
    }

    /// Create a completion from existing data (used when loading snapshots)
    pub fn from_existing(
        date: NaiveDate,
        quantity: Option<f64>,
        notes: Option<String>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            date,
            quantity,
            notes,
            completed_at,
        }
    }

    /// Check if this completion carries a quantity
    pub fn has_quantity(&self) -> bool {
        self.quantity.is_some()
    }

    /// Check if this completion has notes
    pub fn has_notes(&self) -> bool {
        self.notes.as_deref().is_some_and(|n| !n.trim().is_empty())
    }

    /// Parse a `YYYY-MM-DD` date as used on the command surface
    pub fn parse_date(s: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("expected YYYY-MM-DD, got '{}'", s.trim())))
    }

    fn validate_date(date: &NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
        if *date > today {
            return Err(DomainError::FutureDate);
        }
        Ok(())
    }

    fn validate_quantity(quantity: &Option<f64>) -> Result<(), DomainError> {
        if let Some(value) = quantity {
            if !value.is_finite() || *value < 0.0 {
                return Err(DomainError::InvalidValue {
                    message: "Quantity must be a non-negative number".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_create_valid_completion() {
        let today = now().date_naive();
        let completion = Completion::new(today, Some(12.5), Some("  felt good  "), now()).unwrap();

        assert_eq!(completion.date, today);
        assert_eq!(completion.quantity, Some(12.5));
        assert_eq!(completion.notes.as_deref(), Some("felt good"));
        assert_eq!(completion.completed_at, now());
        assert!(completion.has_quantity());
        assert!(completion.has_notes());
    }

    #[test]
    fn test_blank_notes_are_dropped() {
        let completion = Completion::new(now().date_naive(), None, Some("   "), now()).unwrap();
        assert_eq!(completion.notes, None);
        assert!(!completion.has_notes());
    }

    #[test]
    fn test_future_date_invalid() {
        let tomorrow = now().date_naive() + Duration::days(1);
        let result = Completion::new(tomorrow, None, None, now());
        assert_eq!(result, Err(DomainError::FutureDate));
    }

    #[test]
    fn test_negative_quantity_invalid() {
        let result = Completion::new(now().date_naive(), Some(-1.0), None, now());
        assert!(matches!(result, Err(DomainError::InvalidValue { .. })));

        let result = Completion::new(now().date_naive(), Some(f64::NAN), None, now());
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            Completion::parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(Completion::parse_date("2023-02-29").is_err());
        assert!(Completion::parse_date("").is_err());
    }

    #[test]
    fn test_serialized_field_names() {
        let completion = Completion::new(now().date_naive(), None, None, now()).unwrap();
        let json = serde_json::to_value(&completion).unwrap();
        assert_eq!(json["date"], "2024-03-10");
        assert!(json.get("completedAt").is_some());
        assert!(json.get("quantity").is_none());
    }
}
