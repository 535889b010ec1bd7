//! Utility modules for arena_robotics

pub mod visualization;

pub use visualization::{colors, PathStyle, Visualizer};
