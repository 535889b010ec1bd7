//! Seam traits between the navigation core and its collaborators

use nalgebra::Vector2;
use crate::common::types::MoveCommand;
use crate::telemetry::TelemetrySample;

/// Hardware-abstraction collaborator the servo manager drives.
///
/// Calls are fire-and-forget: the core never awaits a return value.
/// Completion is reported asynchronously through the motion-event
/// channel polled once per control tick.
pub trait HardwareLink {
    /// Translate by (dx, dy) centimeters
    fn translate(&mut self, vector: Vector2<f64>);

    /// Rotate by a signed delta in degrees
    fn rotate(&mut self, delta_deg: f64);

    fn send(&mut self, command: MoveCommand) {
        match command {
            MoveCommand::Translate(v) => self.translate(v),
            MoveCommand::Rotate(d) => self.rotate(d),
        }
    }
}

/// Non-blocking telemetry supplier.
///
/// Absence of a sample is a valid "do nothing this tick" outcome,
/// never an error.
pub trait TelemetrySource {
    fn poll(&mut self) -> Option<TelemetrySample>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::Point2D;
    use std::time::Instant;

    struct RecordingLink {
        commands: Vec<MoveCommand>,
    }

    impl HardwareLink for RecordingLink {
        fn translate(&mut self, vector: Vector2<f64>) {
            self.commands.push(MoveCommand::Translate(vector));
        }

        fn rotate(&mut self, delta_deg: f64) {
            self.commands.push(MoveCommand::Rotate(delta_deg));
        }
    }

    #[test]
    fn test_send_dispatches_to_link() {
        let mut link = RecordingLink { commands: Vec::new() };
        link.send(MoveCommand::Rotate(45.0));
        link.send(MoveCommand::Translate(Vector2::new(1.0, 2.0)));
        assert_eq!(link.commands.len(), 2);
        assert_eq!(link.commands[0], MoveCommand::Rotate(45.0));
    }

    struct EmptySource;

    impl TelemetrySource for EmptySource {
        fn poll(&mut self) -> Option<TelemetrySample> {
            None
        }
    }

    #[test]
    fn test_empty_source_is_not_an_error() {
        let mut source = EmptySource;
        assert!(source.poll().is_none());
        let _ = TelemetrySample::new(Point2D::origin(), 0.0, Instant::now());
    }
}
