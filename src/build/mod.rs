//! Terrain clearing and progressive block placement

pub mod clear;
pub mod placer;

pub use clear::{clear_bounds, clear_positions, ClearStats};
pub use placer::{PlacerState, PlacerStats, ProgressivePlacer};
