//! Foreground step-counting session.
//!
//! Ties a tracker to a sensor source and a permission gate for as long as
//! the caller is in the foreground: [`StepCounterSession::resume`] registers
//! the sensor listener, [`StepCounterSession::pause`] detaches it.

use serde::Serialize;
use tokio::sync::mpsc;

use super::{StepBaselineTracker, TodaySteps};
use crate::permission::{
    check_permission, ensure_permission, Capability, PermissionGate, PermissionStatus,
};
use crate::sensor::{SensorDelay, SensorError, SensorEvent, SensorKind, SensorSource};
use crate::storage::KeyValueStore;

/// Where a session stands with respect to the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingState {
    /// Created, never resumed.
    Idle,
    /// Listening for step-counter events.
    Tracking,
    /// Was tracking; the listener is detached.
    Paused,
    /// The activity-recognition capability is missing.
    PermissionRequired,
    /// The device has no step counter.
    Unsupported,
}

/// Snapshot handed to callers for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Session state
    pub state: TrackingState,

    /// Baseline in effect, if one has been captured
    pub baseline: Option<f32>,

    /// Steps since the baseline; zero while permission is missing or unsupported
    pub steps_today: TodaySteps,
}

/// A tracker bound to a sensor source and a permission gate.
pub struct StepCounterSession<Src, S, G>
where
    Src: SensorSource,
    S: KeyValueStore,
    G: PermissionGate,
{
    tracker: StepBaselineTracker<S>,
    source: Src,
    gate: G,
    delay: SensorDelay,
    state: TrackingState,
    events: Option<mpsc::Receiver<SensorEvent>>,
}

impl<Src, S, G> StepCounterSession<Src, S, G>
where
    Src: SensorSource,
    S: KeyValueStore,
    G: PermissionGate,
{
    /// Creates an idle session. Nothing is registered until [`resume`](Self::resume).
    pub fn new(tracker: StepBaselineTracker<S>, source: Src, gate: G, delay: SensorDelay) -> Self {
        Self {
            tracker,
            source,
            gate,
            delay,
            state: TrackingState::Idle,
            events: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// Registers the step-counter listener if permitted and available.
    ///
    /// Only checks the permission; it never prompts. A `PermissionRequired`
    /// result tells the caller to run [`request_permission`](Self::request_permission)
    /// and resume again.
    pub fn resume(&mut self) -> TrackingState {
        if self.events.is_some() {
            return self.state;
        }

        if !check_permission(&self.gate, Capability::ActivityRecognition).allows_access() {
            tracing::debug!("Step counter not registered, permission missing");
            self.state = TrackingState::PermissionRequired;
            return self.state;
        }

        if !self.source.has_sensor(SensorKind::StepCounter) {
            tracing::info!("Device has no step counter");
            self.state = TrackingState::Unsupported;
            return self.state;
        }

        match self.source.subscribe(SensorKind::StepCounter, self.delay) {
            Ok(rx) => {
                self.events = Some(rx);
                self.state = TrackingState::Tracking;
            }
            Err(SensorError::Unavailable(_)) => {
                self.state = TrackingState::Unsupported;
            }
            Err(e) => {
                tracing::warn!("Failed to register step counter: {e}");
            }
        }
        self.state
    }

    /// Prompts for the activity-recognition capability.
    pub async fn request_permission(&mut self) -> PermissionStatus {
        let status = ensure_permission(&self.gate, Capability::ActivityRecognition).await;
        if status.allows_access() && self.state == TrackingState::PermissionRequired {
            self.state = TrackingState::Idle;
        }
        status
    }

    /// Detaches the listener. Safe to call repeatedly.
    pub fn pause(&mut self) {
        if self.events.take().is_some() {
            self.source.unsubscribe();
            self.state = TrackingState::Paused;
        }
    }

    /// Feeds one event to the tracker.
    ///
    /// Returns `None` for events from other sensors or without values.
    pub fn handle_event(&mut self, event: &SensorEvent) -> Option<TodaySteps> {
        if event.kind != SensorKind::StepCounter {
            return None;
        }
        let cumulative = *event.values.first()?;

        let steps = self.tracker.on_sensor_event(cumulative);
        tracing::debug!("Steps: {steps}");
        Some(steps)
    }

    /// Processes events until the source closes the stream.
    ///
    /// The listener is detached once the stream ends.
    pub async fn run(&mut self) -> StepReport {
        loop {
            let next = match self.events.as_mut() {
                Some(rx) => rx.recv().await,
                None => break,
            };
            match next {
                Some(event) => {
                    self.handle_event(&event);
                }
                None => {
                    self.pause();
                    break;
                }
            }
        }
        self.report()
    }

    /// Current state, baseline and today's steps.
    pub fn report(&self) -> StepReport {
        let steps_today = match self.state {
            TrackingState::PermissionRequired | TrackingState::Unsupported => 0,
            _ => self.tracker.current_steps(),
        };
        StepReport {
            state: self.state,
            baseline: self.tracker.baseline(),
            steps_today,
        }
    }

    /// Detaches the listener and waits for any pending baseline write.
    pub async fn shutdown(mut self) -> StepReport {
        self.pause();
        self.tracker.flush().await;
        self.report()
    }
}
