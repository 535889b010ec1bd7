//! Signal-strength accumulator for the antenna sweep
//!
//! Owned by the sweep phase and dropped with it; nothing here outlives
//! the phase, so there is no shared dictionary to forget to clear.

use crate::common::types::Point2D;

#[derive(Debug, Clone, Default)]
pub struct SignalScan {
    readings: Vec<(Point2D, f64)>,
}

impl SignalScan {
    pub fn new() -> Self {
        Self { readings: Vec::new() }
    }

    /// Record one (position, strength) reading along the sweep
    pub fn record(&mut self, position: Point2D, strength: f64) {
        self.readings.push((position, strength));
    }

    /// Position of the strongest reading, if any was recorded
    pub fn strongest(&self) -> Option<Point2D> {
        self.readings
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(p, _)| *p)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
