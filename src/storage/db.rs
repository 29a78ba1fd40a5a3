//! SQLite storage layer for stepbase

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use super::models::Preference;
use super::{StorageError, STEP_PREFERENCES_NAME};

/// Environment variable that overrides the data directory.
pub const HOME_ENV: &str = "STEPBASE_HOME";

/// Get the data directory (`$STEPBASE_HOME` or `~/.stepbase`)
pub fn data_dir() -> Result<PathBuf, StorageError> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }

    Ok(dirs::home_dir()
        .ok_or(StorageError::NoHomeDir)?
        .join(".stepbase"))
}

/// Get the default database path
pub fn default_db_path() -> Result<PathBuf, StorageError> {
    let dir = data_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("{STEP_PREFERENCES_NAME}.db")))
}

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open the default database
    pub fn open_default() -> Result<Self, StorageError> {
        let path = default_db_path()?;
        Self::open(&path)
    }

    /// Open a database that lives only as long as the connection
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Run migrations
    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value REAL NOT NULL,
                updated_at TEXT NOT NULL
            );

            INSERT OR IGNORE INTO schema_version (version) VALUES (1);
            "#,
        )?;
        Ok(())
    }

    // ==================== Preferences ====================

    /// Get a float value by key
    pub fn get_float(&self, key: &str) -> Result<Option<f32>, StorageError> {
        let value: Option<f64> = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.map(|v| v as f32))
    }

    /// Insert or replace a float value
    pub fn set_float(&self, key: &str, value: f32) -> Result<(), StorageError> {
        self.conn.execute(
            r#"
            INSERT INTO preferences (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = ?2,
                updated_at = ?3
            "#,
            params![key, f64::from(value), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Delete a value; missing keys are ignored
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM preferences WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Get the full record for a key, including when it was written
    pub fn get_preference(&self, key: &str) -> Result<Option<Preference>, StorageError> {
        let row: Option<(String, f64, String)> = self
            .conn
            .query_row(
                "SELECT key, value, updated_at FROM preferences WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(key, value, updated_at)| -> Result<Preference, StorageError> {
            let parsed = chrono::DateTime::parse_from_rfc3339(&updated_at)
                .map_err(|_| StorageError::InvalidTimestamp {
                    key: key.clone(),
                    value: updated_at.clone(),
                })?
                .with_timezone(&Utc);
            Ok(Preference {
                key,
                value: value as f32,
                updated_at: parsed,
            })
        })
        .transpose()
    }

    // ==================== Stats ====================

    /// Get total preference count
    pub fn preference_count(&self) -> Result<i32, StorageError> {
        let count: i32 =
            self.conn
                .query_row("SELECT COUNT(*) FROM preferences", [], |row| row.get(0))?;
        Ok(count)
    }
}
