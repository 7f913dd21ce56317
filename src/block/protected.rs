//! Protection policy for player-owned structures
//!
//! Protected blocks are never cleared or overwritten by builds and digs.
//! Undo is exempt: restoring a snapshot may legitimately write a
//! protected type back into the world.

use crate::block::spec::{BlockKind, BlockSpec};

/// True for block kinds the engine must never clear or overwrite:
/// spawn points, storage, and valuable utility blocks.
pub fn is_protected(kind: BlockKind) -> bool {
    matches!(
        kind,
        BlockKind::Bed
            | BlockKind::RespawnAnchor
            | BlockKind::Chest
            | BlockKind::EnderChest
            | BlockKind::Barrel
            | BlockKind::ShulkerBox
            | BlockKind::Beacon
            | BlockKind::EnchantingTable
            | BlockKind::Anvil
    )
}

/// Convenience predicate over a full block spec.
pub fn is_protected_spec(spec: &BlockSpec) -> bool {
    is_protected(spec.kind())
}
