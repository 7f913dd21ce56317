//! Blueprint placement planning
//!
//! Turns a parsed blueprint into an ordered, absolute placement set:
//! drop "no block" entries, rotate each position and each
//! orientation-bearing property, then translate by the build origin.

use crate::block::BlockSpec;
use crate::blueprint::Blueprint;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result, Rotation};
use crate::math::rotation::rotate_position;
use crate::math::BlockBounds;
use crate::plan::placement::{Placement, PlacementSet};

/// A blueprint resolved into concrete world mutations, ready for
/// snapshot capture, clearing, and progressive placement.
#[derive(Clone, Debug)]
pub struct PlannedBuild {
    /// Operation label for snapshots and logs (the blueprint id).
    pub label: String,
    /// Absolute build origin, also the anchor for effects.
    pub origin: IVec3,
    pub placements: PlacementSet,
    pub bounds: BlockBounds,
    /// Entries dropped because their block spec failed validation.
    /// Absorbed per-block, reported for observability only.
    pub dropped: usize,
}

/// Plan a blueprint build at `origin` with the given rotation.
///
/// Fails only if the blueprint yields no placeable block at all;
/// individual unparseable entries are counted and dropped.
pub fn plan_blueprint(
    blueprint: &Blueprint,
    origin: IVec3,
    rotation: Rotation,
) -> Result<PlannedBuild> {
    let mut placements = Vec::with_capacity(blueprint.len());
    let mut dropped = 0usize;

    for entry in &blueprint.entries {
        if entry.block.is_empty() {
            continue;
        }
        let spec = match BlockSpec::from_parts(&entry.block, entry.properties.iter().cloned()) {
            Ok(spec) => spec,
            Err(e) => {
                if dropped == 0 {
                    log::warn!(
                        "blueprint {}: dropping entry at {:?}: {e}",
                        blueprint.id,
                        entry.pos
                    );
                }
                dropped += 1;
                continue;
            }
        };
        if spec.is_air() {
            continue;
        }
        let relative = IVec3::from(entry.pos);
        let pos = origin + rotate_position(relative, rotation);
        placements.push(Placement::new(pos, spec.rotated(rotation)));
    }

    if dropped > 0 {
        log::warn!(
            "blueprint {}: dropped {dropped} invalid entries",
            blueprint.id
        );
    }

    let placements = PlacementSet::from_unordered(placements);
    let bounds = placements
        .bounds()
        .ok_or_else(|| Error::Blueprint(format!("{}: no placeable blocks", blueprint.id)))?;

    Ok(PlannedBuild {
        label: blueprint.id.clone(),
        origin,
        placements,
        bounds,
        dropped,
    })
}
