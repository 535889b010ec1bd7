//! ArenaRobotics - motion-control core for an autonomous arena robot
//!
//! This crate provides the navigation core that drives a two-phase
//! (rotate-then-translate) mobile robot across a competition table:
//! a potential cost field over the arena, a weighted A* waypoint
//! planner, the robot's believed kinematic state, and the closed-loop
//! servo state machine that turns asynchronous telemetry into safe
//! movement commands.

// Core modules
pub mod common;
pub mod utils;

// Navigation modules
pub mod pathfinding;
pub mod kinematics;
pub mod servo;
pub mod telemetry;
pub mod mission;

// Re-export common types for convenience
pub use common::{Point2D, Path2D, Obstacle, ObstacleTag, MoveCommand};
pub use common::{HardwareLink, TelemetrySource};
pub use common::{NavError, NavResult};
pub use telemetry::TelemetrySample;
