//! Async preference store backed by the SQLite [`Database`].
//!
//! `rusqlite` is blocking, so every call hops onto the blocking pool and
//! takes the connection lock there. Only one tracker writes the baseline
//! key, so the lock is never contended in practice.

use std::path::Path;
use std::sync::{Arc, Mutex};

use super::db::Database;
use super::{KeyValueStore, StorageError};

/// Cloneable handle to a SQLite-backed preference file.
#[derive(Clone)]
pub struct PreferenceStore {
    db: Arc<Mutex<Database>>,
}

impl PreferenceStore {
    /// Opens (or creates) the preference file at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open(path)?))
    }

    /// Opens the preference file in the default data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_default()?))
    }

    /// Wraps an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || {
            let guard = db.lock().map_err(|_| StorageError::Poisoned)?;
            f(&guard)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }
}

impl KeyValueStore for PreferenceStore {
    async fn get_float(&self, key: &str) -> Result<Option<f32>, StorageError> {
        let key = key.to_string();
        self.with_db(move |db| db.get_float(&key)).await
    }

    async fn set_float(&self, key: &str, value: f32) -> Result<(), StorageError> {
        let key = key.to_string();
        self.with_db(move |db| db.set_float(&key, value)).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.with_db(move |db| db.remove(&key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BASELINE_STEPS_KEY;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_preference_store_round_trip() {
        let dir = tempdir().expect("Failed to create temp directory");
        let store = PreferenceStore::open(&dir.path().join("prefs.db")).expect("open");

        store.set_float(BASELINE_STEPS_KEY, 321.0).await.unwrap();

        assert_eq!(
            store.get_float(BASELINE_STEPS_KEY).await.unwrap(),
            Some(321.0)
        );
    }

    #[tokio::test]
    async fn test_preference_store_survives_reopen() {
        let dir = tempdir().expect("Failed to create temp directory");
        let path = dir.path().join("prefs.db");

        {
            let store = PreferenceStore::open(&path).expect("open");
            store.set_float(BASELINE_STEPS_KEY, 1000.0).await.unwrap();
        }

        let store = PreferenceStore::open(&path).expect("reopen");
        assert_eq!(
            store.get_float(BASELINE_STEPS_KEY).await.unwrap(),
            Some(1000.0)
        );
    }

    #[tokio::test]
    async fn test_preference_store_remove() {
        let store =
            PreferenceStore::from_database(Database::open_in_memory().expect("open in memory"));

        store.set_float(BASELINE_STEPS_KEY, 5.0).await.unwrap();
        store.remove(BASELINE_STEPS_KEY).await.unwrap();

        assert_eq!(store.get_float(BASELINE_STEPS_KEY).await.unwrap(), None);
    }
}
