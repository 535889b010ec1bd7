//! Believed kinematic state of the robot
//!
//! Position and heading are owned here and mutated only through the
//! transition methods below: every update derives from either a
//! telemetry sample or a (vector, elapsed-time) pair, never from a
//! direct external write. Translation vectors are always computed as
//! `target - origin`, with the origin set explicitly by the caller;
//! this is what allows mid-flight replanning without discarding
//! progress.

use nalgebra::Vector2;

use crate::common::types::{normalize_deg, shortest_angular_delta, Point2D};

/// Nominal translation speed of the drivetrain, used only for
/// dead-reckoning between samples
pub const DEFAULT_CRUISE_SPEED_CM_S: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct RobotState {
    position: Point2D,
    heading_deg: f64,
    target_heading_deg: f64,
    target_position: Point2D,
    movement_origin: Point2D,
    cruise_speed_cm_s: f64,
}

impl RobotState {
    pub fn new(position: Point2D, heading_deg: f64) -> Self {
        Self {
            position,
            heading_deg: normalize_deg(heading_deg),
            target_heading_deg: normalize_deg(heading_deg),
            target_position: position,
            movement_origin: position,
            cruise_speed_cm_s: DEFAULT_CRUISE_SPEED_CM_S,
        }
    }

    pub fn with_cruise_speed(mut self, speed_cm_s: f64) -> Self {
        self.cruise_speed_cm_s = speed_cm_s;
        self
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading_deg
    }

    pub fn target_position(&self) -> Point2D {
        self.target_position
    }

    pub fn target_heading(&self) -> f64 {
        self.target_heading_deg
    }

    pub fn movement_origin(&self) -> Point2D {
        self.movement_origin
    }

    /// Adopt an externally observed position (telemetry-confirmed)
    pub fn set_position(&mut self, position: Point2D) {
        self.position = position;
    }

    pub fn set_heading(&mut self, heading_deg: f64) {
        self.heading_deg = normalize_deg(heading_deg);
    }

    /// Set a new target heading; returns the shortest signed rotation
    /// needed to reach it from the current believed heading.
    pub fn set_target_heading(&mut self, heading_deg: f64) -> f64 {
        self.target_heading_deg = normalize_deg(heading_deg);
        shortest_angular_delta(self.heading_deg, self.target_heading_deg)
    }

    /// Residual rotation from the believed heading to the target
    pub fn heading_delta(&self) -> f64 {
        shortest_angular_delta(self.heading_deg, self.target_heading_deg)
    }

    /// Adopt `target` as the new movement target and reset the movement
    /// origin to the current believed position; returns the translation
    /// vector origin -> target.
    pub fn vector_towards_new_target(&mut self, target: Point2D) -> Vector2<f64> {
        self.movement_origin = self.position;
        self.target_position = target;
        self.movement_origin.vector_to(&target)
    }

    /// Recompute the translation vector toward the current target from
    /// an externally observed position, leaving target and origin
    /// untouched. Calling this twice with the same inputs yields the
    /// same vector.
    pub fn vector_towards_current_target(&self, observed: Point2D) -> Vector2<f64> {
        observed.vector_to(&self.target_position)
    }

    /// Explicitly restart the movement origin (e.g. after a correction
    /// phase adopted a fresh telemetry position).
    pub fn set_movement_origin(&mut self, origin: Point2D) {
        self.movement_origin = origin;
    }

    pub fn has_reached_target_position(&self, threshold: f64) -> bool {
        self.position.distance(&self.target_position) <= threshold
    }

    pub fn has_reached_target_heading(&self, threshold_deg: f64) -> bool {
        self.heading_delta().abs() <= threshold_deg
    }

    /// Dead-reckon the believed position along origin -> target for
    /// `dt_secs` at cruise speed, clamped at the target. Used only to
    /// estimate position between telemetry samples; completion of a
    /// movement is never inferred from this.
    pub fn dead_reckon(&mut self, dt_secs: f64) {
        let remaining = self.position.vector_to(&self.target_position);
        let distance = remaining.norm();
        if distance <= f64::EPSILON {
            return;
        }
        let step = (self.cruise_speed_cm_s * dt_secs).min(distance);
        let direction = remaining / distance;
        self.position = self.position.translated(&(direction * step));
    }
}
