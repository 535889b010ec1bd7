//! Common types, errors and traits for arena_robotics

pub mod types;
pub mod error;
pub mod traits;

pub use types::*;
pub use error::*;
pub use traits::*;
