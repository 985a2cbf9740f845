/// Commands for archiving and deleting habits

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::store::{HabitStore, StoreError};

impl<S: HabitStorage> HabitStore<S> {
    /// Remove a habit together with its completion history
    pub fn delete_habit(&mut self, habit_id: &str) -> Result<Habit, StoreError> {
        let result = self.locate(habit_id).map(|index| {
            let habit = self.habits.remove(index);
            tracing::debug!("Deleted habit: {} ({})", habit.name, habit.id);
            habit
        });
        self.finish(result)
    }

    /// Hide a habit from active views, keeping its history
    ///
    /// Archiving an already archived habit succeeds and bumps `updated_at`.
    pub fn archive_habit(&mut self, habit_id: &str) -> Result<(), StoreError> {
        let now = self.now();
        let result = self.locate(habit_id).map(|index| {
            let habit = &mut self.habits[index];
            habit.archive(now);
            tracing::debug!("Archived habit: {} ({})", habit.name, habit.id);
        });
        self.finish(result)
    }

    fn locate(&self, habit_id: &str) -> Result<usize, StoreError> {
        if habit_id.trim().is_empty() {
            return Err(StoreError::InvalidInput("Invalid habit ID.".to_string()));
        }

        self.position(habit_id).ok_or_else(|| StoreError::NotFound {
            habit_id: habit_id.to_string(),
        })
    }
}
