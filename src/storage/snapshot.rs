/// Versioned snapshot format for the stored habit list
///
/// Version 1 wraps the habits in `{"version": 1, "habits": [...]}`. Version 0
/// is a bare array of habit records that may lack `updatedAt`, `archived`, or
/// a completion's `completedAt`. Records of every version are read leniently
/// and missing fields filled with defaults. Upgrading is pure: it takes parsed
/// JSON and returns fully populated current records, so it can be tested
/// without I/O.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{Completion, Frequency, Habit, HabitId, Target, DEFAULT_COLOR};
use crate::storage::StorageError;

/// Snapshot version written by this crate
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u64,
    habits: &'a [Habit],
}

/// Habit record as stored, with every optional field allowed to be missing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredHabit {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    frequency: Option<Frequency>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    track_quantity: Option<bool>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    target: Option<Target>,
    #[serde(default)]
    completions: Vec<StoredCompletion>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    archived: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredCompletion {
    date: NaiveDate,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

/// Serialize habits as a current-version snapshot
pub fn encode(habits: &[Habit]) -> Result<String, StorageError> {
    Ok(serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        habits,
    })?)
}

/// Parse a stored snapshot of any known version
///
/// Malformed documents are treated as empty state. Records that cannot be
/// upgraded are skipped; the rest are still returned.
pub fn decode(raw: &str) -> Vec<Habit> {
    let document: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Stored habits are not valid JSON, starting empty: {}", e);
            return Vec::new();
        }
    };

    let (version, records) = match document {
        Value::Array(records) => (0, records),
        Value::Object(mut map) => {
            let version = map.get("version").and_then(Value::as_u64);
            match (version, map.remove("habits")) {
                (Some(version), Some(Value::Array(records))) => (version, records),
                _ => {
                    tracing::warn!("Stored habits have no version or habit list, starting empty");
                    return Vec::new();
                }
            }
        }
        _ => {
            tracing::warn!("Stored habits are not a list, starting empty");
            return Vec::new();
        }
    };

    if version > SNAPSHOT_VERSION {
        tracing::warn!(
            "Snapshot version {} is newer than supported version {}, reading as current",
            version,
            SNAPSHOT_VERSION
        );
    }

    let total = records.len();
    let habits: Vec<Habit> = records
        .into_iter()
        .filter_map(|record| match upgrade_record(record, version) {
            Ok(habit) => Some(habit),
            Err(e) => {
                tracing::warn!("Skipping unreadable habit record: {}", e);
                None
            }
        })
        .collect();

    if habits.len() != total {
        tracing::warn!("Loaded {} of {} stored habits", habits.len(), total);
    }
    habits
}

/// Upgrade one stored record from `version` to a current Habit
pub fn upgrade_record(record: Value, version: u64) -> Result<Habit, StorageError> {
    let record = serde_json::from_value::<StoredHabit>(record)?;
    if version >= 1 && record.is_incomplete() {
        tracing::warn!(
            "Habit record {} is missing fields required by version {}, filling defaults",
            record.id,
            version
        );
    }
    Ok(normalize(upgrade(record)?))
}

impl StoredHabit {
    fn is_incomplete(&self) -> bool {
        self.description.is_none()
            || self.frequency.is_none()
            || self.color.is_none()
            || self.track_quantity.is_none()
            || self.updated_at.is_none()
            || self.archived.is_none()
            || self.completions.iter().any(|c| c.completed_at.is_none())
    }
}

fn upgrade(record: StoredHabit) -> Result<Habit, StorageError> {
    let id = HabitId::parse(&record.id)
        .ok_or_else(|| StorageError::InvalidRecord("habit record has an empty id".to_string()))?;
    let track_quantity = record.track_quantity.unwrap_or(false);

    let completions = record
        .completions
        .into_iter()
        .map(|c| {
            let completed_at = c.completed_at.unwrap_or_else(|| midnight_utc(c.date));
            Completion::from_existing(c.date, c.quantity, c.notes, completed_at)
        })
        .collect();

    Ok(Habit {
        id,
        name: record.name,
        description: record.description.unwrap_or_default(),
        frequency: record.frequency.unwrap_or_default(),
        color: record.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        track_quantity,
        unit: record.unit,
        target: record.target,
        completions,
        created_at: record.created_at,
        updated_at: record.updated_at.unwrap_or(record.created_at),
        archived: record.archived.unwrap_or(false),
    })
}

/// Restore invariants older writers did not enforce
fn normalize(mut habit: Habit) -> Habit {
    let mut seen = HashSet::new();
    let before = habit.completions.len();
    habit.completions.retain(|c| seen.insert(c.date));
    if habit.completions.len() != before {
        tracing::warn!(
            "Dropped {} duplicate completion dates from habit {}",
            before - habit.completions.len(),
            habit.id
        );
    }

    if !habit.track_quantity {
        habit.unit = None;
    }
    habit
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now)
}
