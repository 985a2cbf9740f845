/// In-memory implementation of the habit storage interface
///
/// Holds the encoded snapshot in a cell, exactly as a persistent backend
/// would, so loading still exercises the snapshot upgrade path. Saves can be
/// made to fail on demand to exercise error reporting.

use std::cell::{Cell, RefCell};

use crate::domain::Habit;
use crate::storage::{snapshot, HabitStorage, StorageError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    raw: RefCell<Option<String>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-encoded snapshot of any version
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// The last successfully saved snapshot
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }
}

impl HabitStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Habit>, StorageError> {
        Ok(self
            .raw
            .borrow()
            .as_deref()
            .map(snapshot::decode)
            .unwrap_or_default())
    }

    fn save(&self, habits: &[Habit]) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Unavailable("in-memory storage is failing saves".to_string()));
        }

        let encoded = snapshot::encode(habits)?;
        *self.raw.borrow_mut() = Some(encoded);
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
