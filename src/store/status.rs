/// Read-only views over the store: statistics, calendars and summaries
///
/// Nothing here mutates the habit list or touches `last_error`.

use chrono::Datelike;
use serde::Serialize;

use crate::analytics::CalendarGrid;
use crate::domain::{Habit, HabitStats};
use crate::storage::HabitStorage;
use crate::store::{HabitStore, StoreError};

/// One line of the habit overview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitSummary {
    pub habit_id: String,
    pub name: String,
    pub archived: bool,
    pub stats: HabitStats,
}

impl HabitSummary {
    /// Streak marker shown next to the name
    pub fn status(&self) -> &'static str {
        match (self.stats.total_completions, self.stats.current_streak) {
            (0, _) => "new",
            (_, 0) => "missed",
            _ => "on_track",
        }
    }
}

/// Overview of several habits
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitSummary>,
    pub summary: String,
    pub message: String,
}

impl<S: HabitStorage> HabitStore<S> {
    /// Statistics for a habit, or `None` if the id is unknown
    pub fn get_stats(&self, habit_id: &str) -> Option<HabitStats> {
        self.habit(habit_id)
            .map(|habit| HabitStats::calculate_at(habit, self.now()))
    }

    /// Heatmap grid of a habit for `year`
    pub fn calendar(&self, habit_id: &str, year: i32) -> Result<CalendarGrid, StoreError> {
        let habit = self.habit(habit_id).ok_or_else(|| StoreError::NotFound {
            habit_id: habit_id.to_string(),
        })?;
        Ok(CalendarGrid::build_at(habit, year, self.now())?)
    }

    /// Heatmap grid of a habit for the current year
    pub fn current_calendar(&self, habit_id: &str) -> Result<CalendarGrid, StoreError> {
        self.calendar(habit_id, self.now().year())
    }

    /// Summaries of the active habits, or of all habits when
    /// `include_archived` is set
    pub fn status(&self, include_archived: bool) -> StatusResponse {
        let habits: Vec<HabitSummary> = self
            .habits
            .iter()
            .filter(|h| include_archived || !h.archived)
            .map(|h| self.summarize(h))
            .collect();

        let summary = if habits.is_empty() {
            "No habits found. Create your first habit to get started!".to_string()
        } else {
            let on_track = habits.iter().filter(|h| h.stats.current_streak > 0).count();
            format!(
                "{} of {} habits on a streak. Total streak days: {}",
                on_track,
                habits.len(),
                habits.iter().map(|h| h.stats.current_streak).sum::<u32>()
            )
        };

        let details: Vec<String> = habits.iter().map(describe).collect();
        let message = if details.is_empty() {
            summary.clone()
        } else {
            format!("{}\n\n{}", summary, details.join("\n\n"))
        };

        StatusResponse {
            habits,
            summary,
            message,
        }
    }

    fn summarize(&self, habit: &Habit) -> HabitSummary {
        HabitSummary {
            habit_id: habit.id.to_string(),
            name: habit.name.clone(),
            archived: habit.archived,
            stats: HabitStats::calculate_at(habit, self.now()),
        }
    }
}

fn describe(summary: &HabitSummary) -> String {
    let stats = &summary.stats;
    let mut text = format!(
        "{} ({}) [{}]\n   Current streak: {} days | Best: {} days | Rate: {:.1}%",
        summary.name,
        summary.habit_id,
        summary.status(),
        stats.current_streak,
        stats.longest_streak,
        stats.completion_rate
    );

    if let (Some(total), Some(average)) = (stats.total_quantity, stats.average_quantity) {
        text.push_str(&format!("\n   Total: {} | Average: {:.2}", total, average));
    }
    if let Some(last) = stats.last_completion_date {
        text.push_str(&format!("\n   Last completed: {}", last));
    }
    if summary.archived {
        text.push_str("\n   (archived)");
    }
    text
}
