/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has the key-value table the snapshot lives in.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables if they don't exist and records the
/// schema version for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version > CURRENT_VERSION {
        return Err(StorageError::Migration(format!(
            "database schema version {} is newer than supported version {}",
            current_version, CURRENT_VERSION
        )));
    }

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = match conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(version) => version,
        // No version record yet means a fresh database
        Err(rusqlite::Error::QueryReturnedNoRows) => 0,
        Err(e) => return Err(e.into()),
    };

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: key-value table
///
/// Values are whole JSON documents addressed by a text key.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    tracing::info!("Applied migration v1: Created key-value store");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initialize_database() {
        let conn = Connection::open_in_memory().unwrap();

        // Should succeed on a fresh database
        let result = initialize_database(&conn);
        assert!(result.is_ok());

        // Should succeed when called again (idempotent)
        let result = initialize_database(&conn);
        assert!(result.is_ok());

        let table_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('kv_store', 'schema_version')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 2);
    }

    #[test]
    fn test_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        initialize_database(&conn).unwrap();
        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_database(&conn).unwrap();
        set_version(&conn, CURRENT_VERSION + 1).unwrap();

        assert!(matches!(
            initialize_database(&conn),
            Err(StorageError::Migration(_))
        ));
    }
}
