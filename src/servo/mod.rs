//! Servo/correction state machine

pub mod status;
pub mod manager;

pub use status::*;
pub use manager::*;
