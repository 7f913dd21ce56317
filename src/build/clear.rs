//! Bulk terrain clearing
//!
//! Replaces regions with air ahead of a build or as the whole of a dig.
//! Clears always suppress neighbor notification, skip positions that are
//! already air, and leave protected blocks standing.

use crate::block::{is_protected_spec, BlockSpec};
use crate::core::types::IVec3;
use crate::math::BlockBounds;
use crate::world::WorldAccessor;

/// What a clearing pass did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClearStats {
    /// Blocks replaced with air.
    pub cleared: usize,
    /// Protected blocks left in place.
    pub skipped_protected: usize,
    /// Writes the world rejected. Absorbed, never aborting.
    pub failed: usize,
}

/// Clear every position inside `bounds`, bottom-to-top.
pub fn clear_bounds(world: &mut impl WorldAccessor, bounds: BlockBounds) -> ClearStats {
    clear_positions(world, bounds.iter())
}

/// Clear an explicit position sequence in the order given.
pub fn clear_positions(
    world: &mut impl WorldAccessor,
    positions: impl IntoIterator<Item = IVec3>,
) -> ClearStats {
    let air = BlockSpec::air();
    let mut stats = ClearStats::default();
    for pos in positions {
        let current = world.get(pos);
        if current.is_air() {
            continue;
        }
        if is_protected_spec(&current) {
            stats.skipped_protected += 1;
            continue;
        }
        match world.set(pos, &air, false) {
            Ok(()) => stats.cleared += 1,
            Err(e) => {
                if stats.failed == 0 {
                    log::warn!("clear: failed at {pos}: {e}");
                }
                stats.failed += 1;
            }
        }
    }
    stats
}
