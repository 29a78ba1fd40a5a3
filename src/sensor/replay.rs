//! A sensor source that replays prepared readings.
//!
//! Used by the CLI to push readings given on the command line or read from
//! a file through the same path live sensor data would take.

use std::collections::HashSet;
use tokio::sync::mpsc;

use super::{SensorDelay, SensorError, SensorEvent, SensorKind, SensorSource};

/// Replays a fixed list of events to whoever subscribes.
///
/// Every queued event is delivered as-is, regardless of the subscribed kind,
/// so consumers must filter by [`SensorEvent::kind`] themselves. The stream
/// closes once all events have been read.
#[derive(Debug)]
pub struct ReplaySource {
    sensors: HashSet<SensorKind>,
    events: Vec<SensorEvent>,
    subscribed: Option<SensorKind>,
}

impl ReplaySource {
    /// A source with a step counter that will deliver `events` in order.
    pub fn new(events: Vec<SensorEvent>) -> Self {
        let mut sensors = HashSet::new();
        sensors.insert(SensorKind::StepCounter);
        Self {
            sensors,
            events,
            subscribed: None,
        }
    }

    /// A step-counter source built from raw cumulative readings.
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = f32>,
    {
        Self::new(readings.into_iter().map(SensorEvent::step_counter).collect())
    }

    /// A source on a device with no sensors at all.
    pub fn without_sensors() -> Self {
        Self {
            sensors: HashSet::new(),
            events: Vec::new(),
            subscribed: None,
        }
    }

    /// The kind currently subscribed to, if any.
    pub fn subscribed(&self) -> Option<SensorKind> {
        self.subscribed
    }
}

impl SensorSource for ReplaySource {
    fn has_sensor(&self, kind: SensorKind) -> bool {
        self.sensors.contains(&kind)
    }

    fn subscribe(
        &mut self,
        kind: SensorKind,
        delay: SensorDelay,
    ) -> Result<mpsc::Receiver<SensorEvent>, SensorError> {
        if !self.has_sensor(kind) {
            return Err(SensorError::Unavailable(kind));
        }
        if let Some(current) = self.subscribed {
            return Err(SensorError::AlreadySubscribed(current));
        }

        let events = std::mem::take(&mut self.events);
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this cannot fill up
            if tx.try_send(event).is_err() {
                break;
            }
        }

        tracing::debug!(%kind, %delay, "Registered sensor listener");
        self.subscribed = Some(kind);
        Ok(rx)
    }

    fn unsubscribe(&mut self) {
        if let Some(kind) = self.subscribed.take() {
            tracing::debug!(%kind, "Unregistered sensor listener");
        }
    }
}
