/// Integration tests running the habit store on an on-disk SQLite database
use habit_heatmap::*;
use habit_heatmap::storage::{HABITS_KEY, SNAPSHOT_VERSION};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::NamedTempFile;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 14, 21, 15, 0).unwrap()
}

fn open(path: &std::path::Path) -> HabitStore<SqliteStorage> {
    let storage = SqliteStorage::new(path).expect("Failed to create storage");
    HabitStore::with_clock(storage, fixed_now).expect("Failed to open store")
}

#[cfg(test)]
mod basic_integration_tests {
    use super::*;

    #[test]
    fn test_store_survives_reopen() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");

        let habit_id = {
            let mut store = open(temp_file.path());
            let id = store
                .add_habit(HabitDraft {
                    name: "Pushups".to_string(),
                    track_quantity: true,
                    unit: Some("reps".to_string()),
                    target: Some(Target {
                        value: 50.0,
                        period: Frequency::Daily,
                    }),
                    ..HabitDraft::default()
                })
                .expect("Failed to add habit");
            for (date, reps) in [("2024-08-12", 20.0), ("2024-08-13", 30.0), ("2024-08-14", 40.0)] {
                store
                    .toggle_completion(id.as_str(), date, Some(reps), None)
                    .expect("Failed to log");
            }
            assert!(store.last_error().is_none());
            id
        };

        let store = open(temp_file.path());
        let habit = store.habit(habit_id.as_str()).expect("Habit missing after reopen");
        assert_eq!(habit.completions.len(), 3);
        assert_eq!(habit.target.map(|t| t.value), Some(50.0));

        let stats = store.get_stats(habit_id.as_str()).unwrap();
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.total_quantity, Some(90.0));
        assert_eq!(stats.average_quantity, Some(30.0));
    }

    #[test]
    fn test_legacy_snapshot_is_upgraded_on_open() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        {
            let storage = SqliteStorage::new(temp_file.path()).unwrap();
            storage
                .set_raw(
                    HABITS_KEY,
                    r#"[
                        {"id": "1700000000000-abc", "name": "Water",
                         "createdAt": "2024-08-01T06:00:00.000Z",
                         "trackQuantity": true, "unit": "glasses",
                         "completions": [
                            {"date": "2024-08-13", "quantity": 6},
                            {"date": "2024-08-14", "quantity": 8}
                         ]},
                        {"name": "No id"}
                    ]"#,
                )
                .unwrap();
        }

        let mut store = open(temp_file.path());
        assert_eq!(store.habits().len(), 1);

        let habit = store.habit("1700000000000-abc").unwrap();
        assert_eq!(habit.updated_at, habit.created_at);
        assert!(!habit.archived);
        assert_eq!(
            habit.completions[0].completed_at,
            Utc.with_ymd_and_hms(2024, 8, 13, 0, 0, 0).unwrap()
        );

        // The next command writes the current snapshot format back
        store.archive_habit("1700000000000-abc").unwrap();
        let raw = store.storage().get_raw(HABITS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SNAPSHOT_VERSION);
        assert_eq!(value["habits"][0]["archived"], true);
    }

    #[test]
    fn test_calendar_from_disk() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let mut store = open(temp_file.path());
        let id = store
            .add_habit(HabitDraft {
                name: "Guitar".to_string(),
                ..HabitDraft::default()
            })
            .unwrap();
        store.toggle_completion(id.as_str(), "2024-02-29", None, None).unwrap();

        let grid = store.calendar(id.as_str(), 2024).unwrap();
        assert_eq!(grid.week_count(), 53);
        assert_eq!(grid.days_in_year_shown(), 366);

        let cell = grid.cell(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        assert_eq!(cell.intensity, Some(ColorIntensity::Fixed));
        assert_eq!(cell.tooltip("units"), "Thursday, February 29, 2024 • Completed");
        assert!(!grid.has_next_year(fixed_now().date_naive()));
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path()).expect("Failed to create storage");

        let dynamic: &dyn HabitStorage = &storage;
        assert!(dynamic.load().unwrap().is_empty());
    }
}
