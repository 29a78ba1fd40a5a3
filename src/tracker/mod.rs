//! Step baseline tracking.
//!
//! A step-counter sensor reports a cumulative count since the device last
//! booted. The tracker captures the first reading it sees as a baseline,
//! persists it, and reports every later reading relative to it.
//!
//! # Day rollover
//!
//! The baseline is never reset automatically. Once set, today's count keeps
//! growing across calendar days until [`StepBaselineTracker::clear_baseline`]
//! is called.

pub mod session;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::storage::{KeyValueStore, StorageError, BASELINE_STEPS_KEY};

pub use session::{StepCounterSession, StepReport, TrackingState};

/// Steps taken since the baseline was captured.
pub type TodaySteps = u64;

/// Computes steps since `baseline`, clamped at zero.
///
/// A reading below the baseline means the sensor restarted its count (the
/// device rebooted) while an older baseline was still stored; that reports
/// zero rather than a negative count.
pub fn today_steps(cumulative: f32, baseline: f32) -> TodaySteps {
    let delta = cumulative - baseline;
    if delta.is_finite() && delta > 0.0 {
        delta as TodaySteps
    } else {
        0
    }
}

fn is_valid_reading(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Converts cumulative sensor readings into today's step count.
///
/// Holds the baseline in memory and writes it to `S` the first time it is
/// set. Events must be fed serially; `&mut self` enforces a single writer.
pub struct StepBaselineTracker<S: KeyValueStore> {
    store: S,
    baseline: Option<f32>,
    current_steps: TodaySteps,
    pending_persist: Option<JoinHandle<()>>,
}

impl<S: KeyValueStore> StepBaselineTracker<S> {
    /// Builds a tracker, loading any stored baseline first.
    ///
    /// A failed read is logged and treated as "no baseline"; the next sensor
    /// event will capture a fresh one.
    pub async fn load(store: S) -> Self {
        let baseline = Self::load_baseline(&store).await;
        Self {
            store,
            baseline,
            current_steps: 0,
            pending_persist: None,
        }
    }

    /// Reads the stored baseline, if there is a usable one.
    pub async fn load_baseline(store: &S) -> Option<f32> {
        match store.get_float(BASELINE_STEPS_KEY).await {
            Ok(Some(value)) if is_valid_reading(value) => {
                tracing::debug!(baseline = value, "Loaded baseline steps");
                Some(value)
            }
            Ok(Some(value)) => {
                tracing::warn!(baseline = value, "Ignoring invalid stored baseline");
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to load baseline steps: {e}");
                None
            }
        }
    }

    /// The baseline currently in effect.
    pub fn baseline(&self) -> Option<f32> {
        self.baseline
    }

    /// Today's count as of the last valid event.
    pub fn current_steps(&self) -> TodaySteps {
        self.current_steps
    }

    /// Handles one cumulative reading and returns today's steps.
    ///
    /// The first reading after the baseline was cleared becomes the new
    /// baseline (so it yields zero) and is persisted in the background.
    /// Non-finite or negative readings are dropped.
    pub fn on_sensor_event(&mut self, cumulative: f32) -> TodaySteps {
        if !is_valid_reading(cumulative) {
            tracing::warn!(reading = cumulative, "Dropping invalid step reading");
            return self.current_steps;
        }

        let baseline = match self.baseline {
            Some(baseline) => baseline,
            None => {
                self.baseline = Some(cumulative);
                self.persist_baseline();
                cumulative
            }
        };

        self.current_steps = today_steps(cumulative, baseline);
        self.current_steps
    }

    /// Writes the in-memory baseline without waiting for the write.
    ///
    /// Only called when the baseline goes from unset to set, so there is one
    /// write per baseline. Failures are logged and not retried. Without a
    /// Tokio runtime the write is skipped.
    fn persist_baseline(&mut self) {
        let Some(value) = self.baseline else {
            return;
        };
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(baseline = value, "No runtime available, baseline not saved");
                return;
            }
        };

        let store = self.store.clone();
        let task = handle.spawn(async move {
            match store.set_float(BASELINE_STEPS_KEY, value).await {
                Ok(()) => tracing::debug!(baseline = value, "Baseline steps saved"),
                Err(e) => tracing::warn!("Failed to save baseline steps: {e}"),
            }
        });
        self.pending_persist = Some(task);
    }

    /// Waits for an in-flight baseline write to finish.
    pub async fn flush(&mut self) {
        if let Some(task) = self.pending_persist.take() {
            if let Err(e) = task.await {
                tracing::warn!("Baseline save task failed: {e}");
            }
        }
    }

    /// Forgets the baseline, both in memory and in storage.
    ///
    /// The next reading starts a new count from zero.
    pub async fn clear_baseline(&mut self) -> Result<(), StorageError> {
        self.flush().await;
        self.store.remove(BASELINE_STEPS_KEY).await?;
        self.baseline = None;
        self.current_steps = 0;
        tracing::info!("Baseline steps cleared");
        Ok(())
    }
}
