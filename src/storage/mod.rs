//! Storage layer for stepbase
//!
//! The tracker only needs a durable float keyed by name. [`KeyValueStore`]
//! is the seam: [`PreferenceStore`] backs it with SQLite on disk and
//! [`MemoryStore`] keeps values in process memory.

pub mod db;
pub mod memory;
pub mod models;
pub mod preferences;

use std::future::Future;

pub use db::Database;
pub use memory::MemoryStore;
pub use models::*;
pub use preferences::PreferenceStore;

/// Name of the preference store holding step-tracking values.
pub const STEP_PREFERENCES_NAME: &str = "step_preferences";

/// Key under which the baseline cumulative count is stored.
pub const BASELINE_STEPS_KEY: &str = "baseline_steps";

/// Errors that can occur while reading or writing stored values.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Creating the data directory or opening the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Neither `STEPBASE_HOME` nor a home directory is available.
    #[error("Could not find home directory")]
    NoHomeDir,

    /// A background storage task panicked or was cancelled.
    #[error("Storage task failed: {0}")]
    Task(String),

    /// Another thread panicked while holding the connection.
    #[error("Database connection lock poisoned")]
    Poisoned,

    /// A stored timestamp could not be parsed.
    #[error("Invalid timestamp for '{key}': {value}")]
    InvalidTimestamp {
        /// Preference key whose row is malformed.
        key: String,
        /// The raw column value.
        value: String,
    },
}

/// Durable asynchronous storage for float preferences.
///
/// Handles are cheap to clone and are passed to whoever needs them; there is
/// no process-wide instance. Writes for a single key come from a single
/// writer, so implementations need no cross-key coordination.
pub trait KeyValueStore: Clone + Send + Sync + 'static {
    /// Reads the value stored under `key`, or `None` if it was never set.
    fn get_float(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<f32>, StorageError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_float(
        &self,
        key: &str,
        value: f32,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
