//! Stored record types
//!
//! These are the rows the SQLite layer hands back, independent of how the
//! tracker interprets them.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single stored preference value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    /// Preference key (e.g., "baseline_steps")
    pub key: String,

    /// Stored value
    pub value: f32,

    /// When the value was last written
    pub updated_at: DateTime<Utc>,
}

impl Preference {
    /// Whole local calendar days between the last write and `today`.
    pub fn days_since_update(&self, today: NaiveDate) -> i64 {
        today
            .signed_duration_since(self.updated_at.with_timezone(&Local).date_naive())
            .num_days()
    }
}
