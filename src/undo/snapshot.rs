//! Pre-mutation world snapshots

use std::collections::HashSet;
use std::time::SystemTime;

use crate::core::types::IVec3;
use crate::plan::Placement;
use crate::world::WorldAccessor;

/// The state of every position an operation is about to touch, captured
/// before the first mutation. Restoring the snapshot verbatim reverses
/// the operation.
#[derive(Clone, Debug)]
pub struct Snapshot {
    label: String,
    blocks: Vec<Placement>,
    created_at: SystemTime,
}

impl Snapshot {
    /// Read the current block at each position. Duplicate positions are
    /// captured once, keeping first-seen order, so restoration never
    /// writes the same position twice.
    pub fn capture(
        world: &impl WorldAccessor,
        positions: impl IntoIterator<Item = IVec3>,
        label: impl Into<String>,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut blocks = Vec::new();
        for pos in positions {
            if seen.insert(pos) {
                blocks.push(Placement::new(pos, world.get(pos)));
            }
        }
        Self {
            label: label.into(),
            blocks,
            created_at: SystemTime::now(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// When the capture ran, for operator-facing history listings.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    pub fn blocks(&self) -> &[Placement] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
