//! Pathfinding: cost field, weighted A*, waypoint queue

pub mod cost_field;
pub mod a_star;
pub mod waypoint;

pub use cost_field::*;
pub use a_star::*;
pub use waypoint::*;
