//! Telemetry samples and the in-order delivery gate
//!
//! Samples arrive from a transport layer running on its own thread and
//! are handed to the core through a non-blocking poll. The core assumes
//! monotonically non-decreasing timestamps; the gate rejects anything
//! out of order before it can corrupt the velocity estimate.

use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::time::Instant;

use crate::common::types::Point2D;
use crate::common::traits::TelemetrySource;

/// One observed (position, heading, timestamp) triple. Immutable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub position: Point2D,
    pub heading_deg: f64,
    pub timestamp: Instant,
}

impl TelemetrySample {
    pub fn new(position: Point2D, heading_deg: f64, timestamp: Instant) -> Self {
        Self { position, heading_deg, timestamp }
    }
}

/// Rejects samples whose timestamp precedes the last accepted one.
#[derive(Debug, Default)]
pub struct TelemetryGate {
    last_timestamp: Option<Instant>,
}

impl TelemetryGate {
    pub fn new() -> Self {
        Self { last_timestamp: None }
    }

    /// Pass the sample through if it is in order, drop it otherwise.
    pub fn accept(&mut self, sample: TelemetrySample) -> Option<TelemetrySample> {
        if let Some(last) = self.last_timestamp {
            if sample.timestamp < last {
                return None;
            }
        }
        self.last_timestamp = Some(sample.timestamp);
        Some(sample)
    }

    pub fn last_timestamp(&self) -> Option<Instant> {
        self.last_timestamp
    }
}

/// Ground speed derived from consecutive accepted samples, used for
/// dead-reckoning the believed position between samples.
#[derive(Debug, Default)]
pub struct VelocityEstimate {
    previous: Option<TelemetrySample>,
    speed_cm_s: f64,
}

impl VelocityEstimate {
    pub fn new() -> Self {
        Self { previous: None, speed_cm_s: 0.0 }
    }

    /// Feed the next in-order sample; returns the updated speed estimate.
    pub fn observe(&mut self, sample: &TelemetrySample) -> f64 {
        if let Some(prev) = self.previous {
            let dt = sample.timestamp.duration_since(prev.timestamp).as_secs_f64();
            if dt > 0.0 {
                self.speed_cm_s = prev.position.distance(&sample.position) / dt;
            }
        }
        self.previous = Some(*sample);
        self.speed_cm_s
    }

    pub fn speed_cm_s(&self) -> f64 {
        self.speed_cm_s
    }
}

/// Telemetry source backed by an mpsc channel from the transport thread.
pub struct ChannelTelemetrySource {
    receiver: Receiver<TelemetrySample>,
    gate: TelemetryGate,
}

impl ChannelTelemetrySource {
    pub fn new(receiver: Receiver<TelemetrySample>) -> Self {
        Self { receiver, gate: TelemetryGate::new() }
    }
}

impl TelemetrySource for ChannelTelemetrySource {
    fn poll(&mut self) -> Option<TelemetrySample> {
        match self.receiver.try_recv() {
            Ok(sample) => self.gate.accept(sample),
            // Disconnected transport looks like silence; the mission
            // layer owns the decision to abort.
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

/// Build a connected (sender, source) pair for the transport layer.
pub fn channel_source() -> (Sender<TelemetrySample>, ChannelTelemetrySource) {
    let (tx, rx) = channel();
    (tx, ChannelTelemetrySource::new(rx))
}
