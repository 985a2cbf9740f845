/// Unit tests for the public habit API
use habit_heatmap::*;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 2, 10, 0, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habit_with(track_quantity: bool, days: &[(NaiveDate, Option<f64>)]) -> Habit {
    let mut habit = Habit::new(
        HabitDraft {
            name: "Test Habit".to_string(),
            track_quantity,
            unit: track_quantity.then(|| "pages".to_string()),
            ..HabitDraft::default()
        },
        now() - Duration::days(30),
    )
    .expect("valid habit");
    for (day, quantity) in days {
        habit.toggle_completion(*day, *quantity, None, now()).unwrap();
    }
    habit
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_validation_reports_every_field() {
        let draft = HabitDraft {
            name: "n".repeat(51),
            description: Some("d".repeat(201)),
            track_quantity: true,
            unit: None,
            target: Some(Target {
                value: 0.0,
                period: Frequency::Weekly,
            }),
            ..HabitDraft::default()
        };

        let fields: Vec<HabitField> = validate_habit(&draft).iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![HabitField::Name, HabitField::Description, HabitField::Unit, HabitField::Target]
        );
    }

    #[test]
    fn test_current_streak_from_today() {
        let today = now().date_naive();
        let habit = habit_with(
            false,
            &[
                (today, None),
                (today - Duration::days(1), None),
                (today - Duration::days(2), None),
                (today - Duration::days(4), None),
            ],
        );

        let stats = HabitStats::calculate_at(&habit, now());
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.total_completions, 4);
        assert_eq!(stats.last_completion_date, Some(today));
    }

    #[test]
    fn test_streak_broken_without_today() {
        let today = now().date_naive();
        let habit = habit_with(false, &[(today - Duration::days(1), None)]);

        let stats = HabitStats::calculate_at(&habit, now());
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 1);
    }

    #[test]
    fn test_quantity_aggregates() {
        let today = now().date_naive();
        let habit = habit_with(
            true,
            &[
                (today - Duration::days(5), Some(1.0)),
                (today - Duration::days(3), Some(5.0)),
                (today - Duration::days(1), Some(10.0)),
            ],
        );

        let stats = HabitStats::calculate_at(&habit, now());
        assert_eq!(stats.total_quantity, Some(16.0));
        let average = stats.average_quantity.unwrap();
        assert!((average - 16.0 / 3.0).abs() < 1e-9);
        // Three completions over thirty days since creation
        assert!((stats.completion_rate - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_shape() {
        let habit = habit_with(false, &[]);
        for year in [2021, 2024, 2028] {
            let grid = CalendarGrid::build_at(&habit, year, now()).unwrap();
            assert!(grid.week_count() == 53 || grid.week_count() == 54);

            let first = grid.at(0, 0).unwrap();
            assert_eq!(first.date.weekday(), Weekday::Sun);
            assert!(first.date <= date(year, 1, 1));
            assert!(grid.contains(date(year, 12, 31)));
            assert_eq!(grid.month_labels.len(), 12);
        }
    }

    #[test]
    fn test_grid_flags() {
        let today = now().date_naive();
        let habit = habit_with(true, &[(today - Duration::days(1), Some(5.0)), (today, Some(8.0))]);
        let grid = CalendarGrid::build_at(&habit, 2024, now()).unwrap();

        let cell = grid.cell(today).unwrap();
        assert!(cell.is_today && cell.is_completed && !cell.is_future);
        assert_eq!(cell.intensity, Some(ColorIntensity::Scaled(IntensityBand::Full)));

        let yesterday = grid.cell(today - Duration::days(1)).unwrap();
        assert_eq!(yesterday.intensity, Some(ColorIntensity::Scaled(IntensityBand::High)));
        assert_eq!(
            yesterday.intensity.unwrap().apply(&habit.color),
            format!("{}c0", habit.color)
        );

        let tomorrow = grid.cell(today + Duration::days(1)).unwrap();
        assert!(tomorrow.is_future && !tomorrow.is_interactive());
    }

    #[test]
    fn test_store_toggle_restores_state() {
        let mut store = HabitStore::open(MemoryStorage::new()).unwrap();
        let id = store
            .add_habit(HabitDraft {
                name: "Stretch".to_string(),
                ..HabitDraft::default()
            })
            .unwrap();
        let before = store.habit(id.as_str()).unwrap().completions.clone();

        let today = Utc::now().date_naive().to_string();
        store.toggle_completion(id.as_str(), &today, None, None).unwrap();
        store.toggle_completion(id.as_str(), &today, None, None).unwrap();

        assert_eq!(store.habit(id.as_str()).unwrap().completions, before);
    }
}
