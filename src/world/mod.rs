//! World access and effect seams
//!
//! All block reads and writes go through [`WorldAccessor`], and all
//! cosmetic feedback (particles, sounds, progress pings in the original
//! game surface) goes through [`EffectSink`]. Both are trait seams so the
//! engine core stays independent of any particular world backend.

pub mod grid;

use crate::block::BlockSpec;
use crate::core::types::{IVec3, Result};

pub use grid::GridWorld;

/// The single mutation pathway into a voxel world.
///
/// Implementations are driven exclusively from the world task; the
/// engine never calls these methods concurrently.
pub trait WorldAccessor {
    /// Read the block at a position. Unoccupied positions read as air.
    fn get(&self, pos: IVec3) -> BlockSpec;

    /// Write a block. `notify_neighbors: false` suppresses neighbor
    /// update propagation so mass writes cannot trigger cascading
    /// reactions mid-operation.
    fn set(&mut self, pos: IVec3, spec: &BlockSpec, notify_neighbors: bool) -> Result<()>;

    /// Activate whatever block currently occupies a position so
    /// self-scheduling mechanisms start running. Suppressed-notification
    /// writes only notify neighbors; they never schedule the block
    /// itself.
    fn settle(&mut self, pos: IVec3) -> Result<()>;

    /// False once the underlying world handle has been torn down. A
    /// running placer halts early (with partial results) when this
    /// flips.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Sink for purely cosmetic operation feedback. Nothing here has a
/// correctness role; the default implementation ignores everything.
pub trait EffectSink {
    /// A build began clearing and placing at `origin`.
    fn build_started(&mut self, _label: &str, _origin: IVec3) {}

    /// Periodic placement progress, `fraction` in 0.0..=1.0.
    fn progress(&mut self, _origin: IVec3, _fraction: f32) {}

    /// A progressive build reached its terminal state.
    fn build_complete(&mut self, _label: &str, _origin: IVec3) {}

    /// A dig operation mutated the world.
    fn dig_started(&mut self, _label: &str, _origin: IVec3) {}

    /// A snapshot was restored.
    fn undo_complete(&mut self, _label: &str) {}
}

/// Effect sink that logs at debug level. Useful default for headless
/// deployments.
#[derive(Debug, Default)]
pub struct LogEffects;

impl EffectSink for LogEffects {
    fn build_started(&mut self, label: &str, origin: IVec3) {
        log::debug!("effect: build {label} started at {origin}");
    }

    fn progress(&mut self, origin: IVec3, fraction: f32) {
        log::debug!("effect: build progress {:.0}% at {origin}", fraction * 100.0);
    }

    fn build_complete(&mut self, label: &str, origin: IVec3) {
        log::debug!("effect: build {label} complete at {origin}");
    }

    fn dig_started(&mut self, label: &str, origin: IVec3) {
        log::debug!("effect: {label} at {origin}");
    }

    fn undo_complete(&mut self, label: &str) {
        log::debug!("effect: undid {label}");
    }
}
