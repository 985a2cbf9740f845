/// Command for creating new habits

use crate::domain::{Habit, HabitDraft, HabitId, MAX_HABITS};
use crate::storage::HabitStorage;
use crate::store::{HabitStore, StoreError};

impl<S: HabitStorage> HabitStore<S> {
    /// Create a habit from a draft and append it to the list
    ///
    /// Rejected, leaving the list untouched, when the store is full, when the
    /// name matches an existing habit ignoring case, or when the draft fails
    /// validation (only the first validation error is reported).
    pub fn add_habit(&mut self, draft: HabitDraft) -> Result<HabitId, StoreError> {
        let result = self.create_habit(draft);
        self.finish(result)
    }

    fn create_habit(&mut self, draft: HabitDraft) -> Result<HabitId, StoreError> {
        if self.habits.len() >= MAX_HABITS {
            return Err(StoreError::HabitLimit);
        }

        if self.habits.iter().any(|h| h.name_matches(&draft.name)) {
            return Err(StoreError::DuplicateName);
        }

        let habit = Habit::new(draft, self.now())?;
        let habit_id = habit.id.clone();

        tracing::debug!("Created habit: {} ({})", habit.name, habit_id);
        self.habits.push(habit);
        Ok(habit_id)
    }
}
