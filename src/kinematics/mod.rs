//! Robot kinematic state

pub mod robot_state;

pub use robot_state::*;
