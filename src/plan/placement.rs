//! Placement instructions and ordered placement sets

use crate::block::BlockSpec;
use crate::core::types::IVec3;
use crate::math::BlockBounds;

/// One absolute write instruction: put this block at this position.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub pos: IVec3,
    pub spec: BlockSpec,
}

impl Placement {
    pub fn new(pos: IVec3, spec: BlockSpec) -> Self {
        Self { pos, spec }
    }
}

/// Ordered sequence of placements.
///
/// Invariant: sorted ascending by (y, x, z) so materialization runs
/// bottom-to-top. The constructor sorts, so any input order is fine.
#[derive(Clone, Debug, Default)]
pub struct PlacementSet {
    placements: Vec<Placement>,
}

impl PlacementSet {
    pub fn from_unordered(mut placements: Vec<Placement>) -> Self {
        placements.sort_by_key(|p| (p.pos.y, p.pos.x, p.pos.z));
        Self { placements }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.placements.iter().map(|p| p.pos)
    }

    pub fn as_slice(&self) -> &[Placement] {
        &self.placements
    }

    pub fn into_vec(self) -> Vec<Placement> {
        self.placements
    }

    /// Component-wise min/max over every placement position.
    pub fn bounds(&self) -> Option<BlockBounds> {
        BlockBounds::from_positions(self.positions())
    }
}
