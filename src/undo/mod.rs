//! Snapshot capture, bounded history, and undo
//!
//! Every build and dig captures the pre-mutation state of each position
//! it will touch, pushes the snapshot into a bounded history, and only
//! then mutates the world. Undo pops the most recent snapshot and
//! replays it verbatim, with no protection filtering: restoring a
//! protected block is exactly what undo is for.

pub mod history;
pub mod snapshot;

use std::fmt;

pub use history::UndoHistory;
pub use snapshot::Snapshot;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::world::WorldAccessor;

/// Outcome of an undo: how many captured positions were restored and how
/// many failed. Partial restoration is reported, never treated as an
/// abort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoReport {
    pub label: String,
    pub restored: usize,
    pub failed: usize,
}

impl fmt::Display for UndoReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Undid {} ({} blocks restored", self.label, self.restored)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        f.write_str(")")
    }
}

/// Pop the most recent snapshot and restore it.
///
/// Returns [`Error::UndoEmpty`] without touching the world when the
/// history is empty. Per-position restore failures are counted and
/// absorbed; the first is logged.
pub fn undo(history: &mut UndoHistory, world: &mut impl WorldAccessor) -> Result<UndoReport> {
    let snapshot = history.pop().ok_or(Error::UndoEmpty)?;

    let mut restored = 0usize;
    let mut failed = 0usize;
    for placement in snapshot.blocks() {
        match world.set(placement.pos, &placement.spec, false) {
            Ok(()) => restored += 1,
            Err(e) => {
                if failed == 0 {
                    log::warn!("undo: failed to restore block at {}: {e}", placement.pos);
                }
                failed += 1;
            }
        }
    }

    log::info!(
        "undo: restored {restored} blocks{} (was: {})",
        if failed > 0 {
            format!(" ({failed} failed)")
        } else {
            String::new()
        },
        snapshot.label()
    );

    Ok(UndoReport {
        label: snapshot.label().to_string(),
        restored,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockSpec;
    use crate::core::types::IVec3;
    use crate::world::GridWorld;

    #[test]
    fn test_undo_empty_history() {
        let mut history = UndoHistory::new();
        let mut world = GridWorld::new();
        assert!(matches!(
            undo(&mut history, &mut world),
            Err(Error::UndoEmpty)
        ));
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn test_undo_restores_captured_state() {
        let mut world = GridWorld::new();
        let dirt = BlockSpec::parse("minecraft:dirt").unwrap();
        let stone = BlockSpec::parse("minecraft:stone").unwrap();
        let positions = [IVec3::new(0, 64, 0), IVec3::new(1, 64, 0)];
        world.set(positions[0], &dirt, false).unwrap();

        let mut history = UndoHistory::new();
        history.push(Snapshot::capture(&world, positions, "test-build"));

        // Mutate both positions
        for pos in positions {
            world.set(pos, &stone, false).unwrap();
        }

        let report = undo(&mut history, &mut world).unwrap();
        assert_eq!(report.restored, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(world.get(positions[0]), dirt);
        assert!(world.get(positions[1]).is_air());
    }

    #[test]
    fn test_undo_after_partial_build_restores_terrain() {
        // The snapshot is pushed before clearing begins, so a build
        // interrupted mid-placement must still reverse completely
        use crate::build::{clear_bounds, ProgressivePlacer};
        use crate::math::BlockBounds;
        use crate::plan::{Placement, PlacementSet};
        use crate::world::LogEffects;

        let mut world = GridWorld::new();
        let dirt = BlockSpec::parse("minecraft:dirt").unwrap();
        let stone = BlockSpec::parse("minecraft:stone").unwrap();
        let bounds = BlockBounds::new(IVec3::new(0, 64, 0), IVec3::new(19, 68, 19));
        world.fill(bounds.min, bounds.max, &dirt).unwrap();

        let mut history = UndoHistory::new();
        history.push(Snapshot::capture(&world, bounds.iter(), "watchtower"));
        clear_bounds(&mut world, bounds);

        let placements = PlacementSet::from_unordered(
            bounds
                .iter()
                .map(|pos| Placement::new(pos, stone.clone()))
                .collect(),
        );
        let mut placer = ProgressivePlacer::new("watchtower", IVec3::ZERO, placements);
        let mut effects = LogEffects;
        for _ in 0..3 {
            placer.tick(&mut world, &mut effects);
        }
        assert!(!placer.is_complete());
        assert!(placer.stats().placed > 0);

        let report = undo(&mut history, &mut world).unwrap();
        assert_eq!(report.restored as u64, bounds.volume());
        assert_eq!(report.failed, 0);
        for pos in bounds.iter() {
            assert_eq!(world.get(pos), dirt);
        }
    }

    #[test]
    fn test_undo_restores_protected_blocks() {
        // A chest captured in a snapshot must come back even though
        // builds and digs never overwrite chests
        let mut world = GridWorld::new();
        let chest = BlockSpec::parse("minecraft:chest[facing=north]").unwrap();
        let pos = IVec3::new(0, 64, 0);
        world.set(pos, &chest, false).unwrap();

        let mut history = UndoHistory::new();
        history.push(Snapshot::capture(&world, [pos], "test-build"));

        world.set(pos, &BlockSpec::air(), false).unwrap();
        let report = undo(&mut history, &mut world).unwrap();
        assert_eq!(report.restored, 1);
        assert_eq!(world.get(pos), chest);
    }

    #[test]
    fn test_undo_absorbs_per_position_failures() {
        let mut world = GridWorld::with_vertical_range(0, 100);
        let pos_ok = IVec3::new(0, 50, 0);
        let pos_bad = IVec3::new(0, 200, 0);

        // Capture through a permissive world so the snapshot holds an
        // out-of-range position, then restore into the strict one
        let capture_world = GridWorld::new();
        let snapshot = Snapshot::capture(&capture_world, [pos_ok, pos_bad], "test-build");
        let mut history = UndoHistory::new();
        history.push(snapshot);

        let stone = BlockSpec::parse("minecraft:stone").unwrap();
        world.set(pos_ok, &stone, false).unwrap();

        let report = undo(&mut history, &mut world).unwrap();
        // pos_ok restored to air; pos_bad failed but did not abort
        assert_eq!(report.restored, 1);
        assert_eq!(report.failed, 1);
        assert!(world.get(pos_ok).is_air());
    }

    #[test]
    fn test_undo_report_display() {
        let report = UndoReport {
            label: "medieval-blacksmith".to_string(),
            restored: 120,
            failed: 0,
        };
        assert_eq!(
            report.to_string(),
            "Undid medieval-blacksmith (120 blocks restored)"
        );
        let report = UndoReport {
            label: "dig_hole".to_string(),
            restored: 5,
            failed: 2,
        };
        assert_eq!(
            report.to_string(),
            "Undid dig_hole (5 blocks restored, 2 failed)"
        );
    }
}
