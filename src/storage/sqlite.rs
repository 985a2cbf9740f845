/// SQLite implementation of the habit storage interface
///
/// This module keeps the habit snapshot as one JSON document in a small
/// key-value table.

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, params};
use chrono::Utc;

use crate::domain::Habit;
use crate::storage::{migrations, snapshot, HabitStorage, StorageError};

/// Key the habit snapshot is stored under
pub const HABITS_KEY: &str = "habits";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// the load/save contract defined by the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open a private in-memory database (useful for testing)
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        migrations::initialize_database(&conn)?;
        Ok(Self { conn })
    }

    /// Read the raw value stored under `key`
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store a raw value under `key`, replacing any previous value
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl HabitStorage for SqliteStorage {
    fn load(&self) -> Result<Vec<Habit>, StorageError> {
        let habits = match self.get_raw(HABITS_KEY)? {
            Some(raw) => snapshot::decode(&raw),
            None => Vec::new(),
        };

        tracing::debug!("Loaded {} habits from SQLite", habits.len());
        Ok(habits)
    }

    fn save(&self, habits: &[Habit]) -> Result<(), StorageError> {
        let raw = snapshot::encode(habits)?;
        self.set_raw(HABITS_KEY, &raw)?;

        tracing::debug!("Saved {} habits to SQLite", habits.len());
        Ok(())
    }
}
