//! Sensor abstraction.
//!
//! A [`SensorSource`] reports which sensors the device has and hands out a
//! channel of [`SensorEvent`]s for one sensor at a time. Events arrive in
//! order on that single channel, so consumers never see out-of-order
//! readings.
//!
//! # Sources
//!
//! - [`ReplaySource`] - Delivers a prepared list of readings

pub mod replay;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::sync::mpsc;

pub use replay::ReplaySource;

/// Kinds of motion sensor a device may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    /// Cumulative steps since the device booted.
    StepCounter,
    /// One event per detected step.
    StepDetector,
    /// Raw three-axis acceleration.
    Accelerometer,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::StepCounter => write!(f, "step_counter"),
            SensorKind::StepDetector => write!(f, "step_detector"),
            SensorKind::Accelerometer => write!(f, "accelerometer"),
        }
    }
}

/// Requested event delivery rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorDelay {
    /// As fast as the hardware allows.
    Fastest,
    /// Rate suitable for games (20ms).
    Game,
    /// Rate suitable for UI updates (~67ms).
    Ui,
    /// Default rate (200ms).
    #[default]
    Normal,
}

impl fmt::Display for SensorDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorDelay::Fastest => write!(f, "fastest"),
            SensorDelay::Game => write!(f, "game"),
            SensorDelay::Ui => write!(f, "ui"),
            SensorDelay::Normal => write!(f, "normal"),
        }
    }
}

impl FromStr for SensorDelay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fastest" => Ok(SensorDelay::Fastest),
            "game" => Ok(SensorDelay::Game),
            "ui" => Ok(SensorDelay::Ui),
            "normal" => Ok(SensorDelay::Normal),
            _ => Err(format!(
                "unknown sensor delay '{s}' (expected fastest, game, ui or normal)"
            )),
        }
    }
}

/// A single reading delivered by a sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorEvent {
    /// Which sensor produced the reading
    pub kind: SensorKind,

    /// Reading values; a step counter reports its cumulative count in `values[0]`
    pub values: Vec<f32>,

    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
}

impl SensorEvent {
    /// Builds a step-counter reading stamped with the current time.
    pub fn step_counter(cumulative: f32) -> Self {
        Self {
            kind: SensorKind::StepCounter,
            values: vec![cumulative],
            timestamp: Utc::now(),
        }
    }
}

/// Errors returned when registering for sensor events.
#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    /// The device has no sensor of this kind.
    #[error("No {0} sensor available")]
    Unavailable(SensorKind),

    /// A listener is already registered with this source.
    #[error("Already subscribed to {0}")]
    AlreadySubscribed(SensorKind),
}

/// Something that can deliver sensor readings.
pub trait SensorSource {
    /// Whether the device exposes a sensor of this kind.
    fn has_sensor(&self, kind: SensorKind) -> bool;

    /// Registers the single listener and returns its event stream.
    ///
    /// The stream ends when the source has nothing more to deliver.
    fn subscribe(
        &mut self,
        kind: SensorKind,
        delay: SensorDelay,
    ) -> Result<mpsc::Receiver<SensorEvent>, SensorError>;

    /// Detaches the listener. Calling this while unsubscribed is a no-op.
    fn unsubscribe(&mut self);
}
