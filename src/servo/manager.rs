//! Servo/correction manager
//!
//! The closed-loop state machine that consumes live telemetry once per
//! control tick and decides, per axis, whether the robot is still
//! moving, has deviated, has reached a node, or needs a heading
//! correction. Completion of a commanded movement is edge-triggered by
//! the hardware layer through an mpsc channel drained once per tick;
//! elapsed time never gates a transition.

use nalgebra::Vector2;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crate::common::traits::HardwareLink;
use crate::common::types::{shortest_angular_delta, vector_angle_deg, Path2D, Point2D};
use crate::kinematics::RobotState;
use crate::pathfinding::WaypointQueue;
use crate::servo::status::{MotionEvent, RotationStatus, TranslationStatus};
use crate::telemetry::TelemetrySample;

/// Tunables of the correction loop
#[derive(Debug, Clone, Copy)]
pub struct ServoConfig {
    /// Minimum interval between processed ticks; earlier ticks are
    /// logical no-ops, not thread sleeps
    pub min_check_interval: Duration,
    /// Trajectory deviation tolerance, degrees
    pub deviation_threshold_deg: f64,
    /// Distance below which a node counts as reached, centimeters
    pub position_threshold: f64,
    /// Residual heading tolerance, degrees
    pub heading_threshold: f64,
    /// Heading restored after every bulk move
    pub standard_heading_deg: f64,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            min_check_interval: Duration::from_millis(50),
            deviation_threshold_deg: 5.0,
            position_threshold: 1.0,
            heading_threshold: 1.0,
            standard_heading_deg: 90.0,
        }
    }
}

/// What one control tick amounted to, for the mission layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing to do this tick (rate-gated, out-of-order sample, or
    /// still waiting on the hardware)
    Waiting,
    /// Trajectory or fine-position correction reissued
    Corrected,
    /// Intermediate node reached; translation toward the next waypoint
    /// was commanded with this vector
    MovingTowardsCheckpoint(Vector2<f64>),
    /// Final target of the installed path reached
    CheckpointReached,
    /// A standalone rotation step finished and the observed position
    /// was confirmed
    RotationComplete,
}

pub struct ServoManager<H: HardwareLink> {
    hardware: H,
    completions: Receiver<MotionEvent>,
    robot: RobotState,
    waypoints: WaypointQueue,
    translation: TranslationStatus,
    rotation: RotationStatus,
    config: ServoConfig,
    // per-instance, so parallel robots (and tests) cannot contaminate
    // each other's rate gate
    last_check: Option<Instant>,
    translation_done: bool,
    rotation_done: bool,
}

impl<H: HardwareLink> ServoManager<H> {
    pub fn new(
        hardware: H,
        completions: Receiver<MotionEvent>,
        robot: RobotState,
        config: ServoConfig,
    ) -> Self {
        Self {
            hardware,
            completions,
            robot,
            waypoints: WaypointQueue::new(),
            translation: TranslationStatus::Idle,
            rotation: RotationStatus::Idle,
            config,
            last_check: None,
            translation_done: false,
            rotation_done: false,
        }
    }

    pub fn robot(&self) -> &RobotState {
        &self.robot
    }

    pub fn translation_status(&self) -> TranslationStatus {
        self.translation
    }

    pub fn rotation_status(&self) -> RotationStatus {
        self.rotation
    }

    pub fn waypoints(&self) -> &WaypointQueue {
        &self.waypoints
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// Install a freshly planned waypoint queue (replacing any previous
    /// one), command translation toward its first node, and return the
    /// path snapshot for the path-changed broadcast.
    pub fn start_path(&mut self, queue: WaypointQueue) -> Path2D {
        let snapshot = queue.as_path();
        self.waypoints = queue;
        if let Some(first) = self.waypoints.pop_next() {
            let vector = self.robot.vector_towards_new_target(first);
            self.hardware.translate(vector);
            self.translation = TranslationStatus::Moving;
            self.translation_done = false;
        } else {
            self.translation = TranslationStatus::Idle;
        }
        snapshot
    }

    /// Command a standalone shortest-arc rotation to `target_heading`
    pub fn start_rotation(&mut self, target_heading_deg: f64) {
        let delta = self.robot.set_target_heading(target_heading_deg);
        self.hardware.rotate(delta);
        self.rotation = RotationStatus::Rotating;
        self.rotation_done = false;
    }

    /// Force both axes back to idle for recovery; the mission layer
    /// owns the decision that a step has taken too long.
    pub fn reset(&mut self) {
        self.translation = TranslationStatus::Idle;
        self.rotation = RotationStatus::Idle;
        self.waypoints.clear();
        self.translation_done = false;
        self.rotation_done = false;
        self.last_check = None;
    }

    /// One control tick driven by the latest telemetry sample.
    ///
    /// Never returns an error: rate-gated, out-of-order, and
    /// nothing-pending ticks all come back as `Waiting`.
    pub fn tick(&mut self, sample: &TelemetrySample) -> TickOutcome {
        if !self.pass_rate_gate(sample.timestamp) {
            return TickOutcome::Waiting;
        }
        self.drain_completions();

        // The drivetrain serializes rotation and translation; both
        // axes active at once is a programming error upstream.
        debug_assert!(
            self.rotation == RotationStatus::Idle
                || self.translation == TranslationStatus::Idle,
            "rotation and translation active simultaneously"
        );

        if self.rotation != RotationStatus::Idle {
            return self.tick_rotation(sample);
        }
        self.tick_translation(sample)
    }

    fn pass_rate_gate(&mut self, timestamp: Instant) -> bool {
        if let Some(last) = self.last_check {
            if timestamp < last {
                return false;
            }
            if timestamp.duration_since(last) < self.config.min_check_interval {
                return false;
            }
        }
        self.last_check = Some(timestamp);
        true
    }

    fn drain_completions(&mut self) {
        while let Ok(event) = self.completions.try_recv() {
            match event {
                MotionEvent::TranslationDone => self.translation_done = true,
                MotionEvent::RotationDone => self.rotation_done = true,
            }
        }
    }

    fn tick_translation(&mut self, sample: &TelemetrySample) -> TickOutcome {
        match self.translation {
            TranslationStatus::Idle => TickOutcome::Waiting,
            TranslationStatus::Moving => {
                if !self.translation_done {
                    return self.check_deviation(sample);
                }
                // bulk move done: settle the heading drift it introduced
                self.translation_done = false;
                self.robot.set_position(sample.position);
                self.robot.set_heading(sample.heading_deg);
                let delta = self.robot.set_target_heading(self.config.standard_heading_deg);
                self.hardware.rotate(delta);
                self.rotation_done = false;
                self.translation = TranslationStatus::CorrectingHeading;
                TickOutcome::Waiting
            }
            TranslationStatus::CorrectingHeading => {
                if !self.rotation_done {
                    return TickOutcome::Waiting;
                }
                // heading settled: fine-correct position from the
                // freshly observed telemetry position
                self.rotation_done = false;
                self.robot.set_heading(sample.heading_deg);
                self.robot.set_position(sample.position);
                self.robot.set_movement_origin(sample.position);
                let vector = self.robot.vector_towards_current_target(sample.position);
                self.hardware.translate(vector);
                self.translation_done = false;
                self.translation = TranslationStatus::CorrectingPosition;
                TickOutcome::Waiting
            }
            TranslationStatus::CorrectingPosition => {
                if !self.translation_done {
                    return TickOutcome::Waiting;
                }
                self.translation_done = false;
                self.advance_at(sample.position)
            }
        }
    }

    /// Deviation detection while a bulk move is in flight: the angle
    /// between origin->target and origin->observed beyond the threshold
    /// means the trajectory is off-course, and the translation is
    /// reissued from the observed position toward the same target.
    fn check_deviation(&mut self, sample: &TelemetrySample) -> TickOutcome {
        let origin = self.robot.movement_origin();
        let commanded = origin.vector_to(&self.robot.target_position());
        let observed = origin.vector_to(&sample.position);
        // too little travel to tell direction yet
        if observed.norm() < 1e-6 || commanded.norm() < 1e-6 {
            return TickOutcome::Waiting;
        }
        let deviation =
            shortest_angular_delta(vector_angle_deg(&commanded), vector_angle_deg(&observed));
        if deviation.abs() <= self.config.deviation_threshold_deg {
            return TickOutcome::Waiting;
        }
        let vector = self.robot.vector_towards_current_target(sample.position);
        self.robot.set_position(sample.position);
        self.robot.set_movement_origin(sample.position);
        self.hardware.translate(vector);
        TickOutcome::Corrected
    }

    /// Node progress at an observed position after a fine correction
    /// finished: checkpoint reached, next waypoint commanded, or one
    /// more correction pass toward the same node.
    fn advance_at(&mut self, observed: Point2D) -> TickOutcome {
        self.robot.set_position(observed);
        if observed.distance(&self.robot.target_position()) <= self.config.position_threshold {
            if let Some(next) = self.waypoints.pop_next() {
                let vector = self.robot.vector_towards_new_target(next);
                self.hardware.translate(vector);
                self.translation = TranslationStatus::Moving;
                self.translation_done = false;
                TickOutcome::MovingTowardsCheckpoint(vector)
            } else {
                self.robot.set_movement_origin(observed);
                self.translation = TranslationStatus::Idle;
                TickOutcome::CheckpointReached
            }
        } else {
            // overshoot/undershoot: recompute without a full replan
            self.robot.set_movement_origin(observed);
            let vector = self.robot.vector_towards_current_target(observed);
            self.hardware.translate(vector);
            self.translation_done = false;
            TickOutcome::Corrected
        }
    }

    fn tick_rotation(&mut self, sample: &TelemetrySample) -> TickOutcome {
        match self.rotation {
            RotationStatus::Idle => TickOutcome::Waiting,
            RotationStatus::Rotating => {
                if !self.rotation_done {
                    return TickOutcome::Waiting;
                }
                // compensate mechanical overshoot with a small
                // corrective rotation toward the exact target
                self.rotation_done = false;
                self.robot.set_heading(sample.heading_deg);
                if self.robot.has_reached_target_heading(self.config.heading_threshold) {
                    self.robot.set_position(sample.position);
                    self.rotation = RotationStatus::Idle;
                    return TickOutcome::RotationComplete;
                }
                let residual = self.robot.heading_delta();
                self.hardware.rotate(residual);
                self.rotation = RotationStatus::CorrectingHeading;
                TickOutcome::Waiting
            }
            RotationStatus::CorrectingHeading => {
                if !self.rotation_done {
                    return TickOutcome::Waiting;
                }
                self.rotation_done = false;
                self.robot.set_heading(sample.heading_deg);
                self.robot.set_position(sample.position);
                self.rotation = RotationStatus::Idle;
                TickOutcome::RotationComplete
            }
        }
    }
}
