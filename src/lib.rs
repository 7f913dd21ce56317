//! Terraforge - a reversible voxel world-mutation engine
//!
//! Materializes declarative blueprints and procedural dig shapes (holes,
//! tunnels, staircases, shafts) into a live voxel world. Large builds are
//! spread across scheduling quanta instead of blocking the world's single
//! mutation pathway, and every operation captures a pre-mutation snapshot
//! so it can be fully reversed.

pub mod block;
pub mod blueprint;
pub mod build;
pub mod core;
pub mod engine;
pub mod math;
pub mod plan;
pub mod undo;
pub mod world;
