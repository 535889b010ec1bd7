//! Mission layer: game map, step table, capture budget, antenna sweep

pub mod game_map;
pub mod steps;
pub mod capture;
pub mod antenna;

pub use game_map::*;
pub use steps::*;
pub use capture::*;
pub use antenna::*;
