/// Command for logging and un-logging habit completions

use serde::Deserialize;

use crate::domain::{Completion, ToggleOutcome};
use crate::storage::HabitStorage;
use crate::store::{HabitStore, StoreError};

/// Arguments of a toggle, as sent by a UI or read from a request file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleCompletionParams {
    pub habit_id: String,
    /// Day to toggle, `YYYY-MM-DD`
    pub date: String,
    pub quantity: Option<f64>,
    pub notes: Option<String>,
}

impl<S: HabitStorage> HabitStore<S> {
    /// Toggle a habit's completion for a date
    ///
    /// Removes the completion when the date is already logged; otherwise
    /// adds one, refusing when the habit is at its completion limit or the
    /// date lies in the future. The quantity is kept only for habits that
    /// track quantity, and notes only when not blank.
    pub fn toggle_completion(
        &mut self,
        habit_id: &str,
        date: &str,
        quantity: Option<f64>,
        notes: Option<&str>,
    ) -> Result<ToggleOutcome, StoreError> {
        let result = self.apply_toggle(habit_id, date, quantity, notes);
        self.finish(result)
    }

    /// Same as [`HabitStore::toggle_completion`], taking a params struct
    pub fn toggle(&mut self, params: &ToggleCompletionParams) -> Result<ToggleOutcome, StoreError> {
        self.toggle_completion(
            &params.habit_id,
            &params.date,
            params.quantity,
            params.notes.as_deref(),
        )
    }

    fn apply_toggle(
        &mut self,
        habit_id: &str,
        date: &str,
        quantity: Option<f64>,
        notes: Option<&str>,
    ) -> Result<ToggleOutcome, StoreError> {
        if habit_id.trim().is_empty() || date.trim().is_empty() {
            return Err(StoreError::InvalidInput("Invalid habit or date.".to_string()));
        }

        let date = Completion::parse_date(date)?;
        let index = self.position(habit_id).ok_or_else(|| StoreError::NotFound {
            habit_id: habit_id.to_string(),
        })?;

        let now = self.now();
        let habit = &mut self.habits[index];
        let outcome = habit.toggle_completion(date, quantity, notes, now)?;

        tracing::debug!("{:?} {} for habit {}", outcome, date, habit.id);
        Ok(outcome)
    }
}
