/// Statistics derived from a habit's completion history
///
/// This module defines the HabitStats struct and the pure calculations behind
/// it: current and longest streak, completion rate, and quantity aggregates.
/// Nothing here is stored; stats are recomputed from the habit on demand.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use crate::domain::Habit;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Calculated statistics for one habit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    /// Total number of completions
    pub total_completions: u32,
    /// Consecutive days completed, counting back from today
    pub current_streak: u32,
    /// Best run of consecutive days ever logged
    pub longest_streak: u32,
    /// Completions per day since creation, as a percentage
    ///
    /// Backfilled history can push this above 100.
    pub completion_rate: f64,
    /// Mean quantity over completions that carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_quantity: Option<f64>,
    /// Sum of quantities over completions that carry one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_quantity: Option<f64>,
    /// Most recent date the habit was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completion_date: Option<NaiveDate>,
}

impl HabitStats {
    /// Calculate stats for a habit as of the current time
    pub fn calculate(habit: &Habit) -> Self {
        Self::calculate_at(habit, Utc::now())
    }

    /// Calculate stats for a habit as of `now`
    ///
    /// All day arithmetic uses the UTC calendar date of `now` as "today".
    pub fn calculate_at(habit: &Habit, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let dates: BTreeSet<NaiveDate> = habit.completions.iter().map(|c| c.date).collect();

        let total_completions = habit.completions.len() as u32;
        let current_streak = current_streak(&dates, today);
        let longest_streak = longest_streak(&dates, current_streak);
        let completion_rate = completion_rate(total_completions, habit.created_at, now);

        let (total_quantity, average_quantity) = if habit.track_quantity {
            quantity_aggregates(habit)
        } else {
            (None, None)
        };

        Self {
            total_completions,
            current_streak,
            longest_streak,
            completion_rate,
            average_quantity,
            total_quantity,
            last_completion_date: dates.iter().next_back().copied(),
        }
    }
}

/// Count consecutive completed days walking backward from today
///
/// The walk starts at today itself, so a habit not yet done today has a
/// current streak of zero even if yesterday was completed.
pub fn current_streak(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut checking_date = today;

    // Each step consumes a distinct date, so the walk is bounded by the set size
    while dates.contains(&checking_date) {
        streak += 1;
        checking_date = checking_date - Duration::days(1);
    }

    streak
}

/// Length of the longest run of consecutive dates
///
/// Dates are scanned newest first; two neighbours belong to the same run when
/// they are exactly one day apart. `seed` (the current streak) is the initial
/// best, so the result is never below it.
pub fn longest_streak(dates: &BTreeSet<NaiveDate>, seed: u32) -> u32 {
    let mut longest = seed;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates.iter().rev() {
        run = match previous {
            Some(prev) if (prev - date).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(date);
    }

    longest
}

/// Percentage of days since creation that have a completion
///
/// Days since creation is rounded up and never less than one, so a habit
/// created moments ago still yields a finite rate.
pub fn completion_rate(total_completions: u32, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    if total_completions == 0 {
        return 0.0;
    }

    let elapsed_ms = (now - created_at).num_milliseconds() as f64;
    let days_since_creation = (elapsed_ms / MILLIS_PER_DAY).ceil().max(1.0);

    total_completions as f64 / days_since_creation * 100.0
}

fn quantity_aggregates(habit: &Habit) -> (Option<f64>, Option<f64>) {
    let quantities: Vec<f64> = habit.completions.iter().filter_map(|c| c.quantity).collect();
    if quantities.is_empty() {
        return (None, None);
    }

    let total: f64 = quantities.iter().sum();
    (Some(total), Some(total / quantities.len() as f64))
}
