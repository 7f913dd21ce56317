//! Progressive, tick-budgeted placement
//!
//! Materializes a placement set over many ticks so a large build never
//! stalls the world task. Each tick writes at most `rate` blocks with
//! neighbor notification suppressed; a finalize pass then settles every
//! written position so self-scheduling blocks start running.

use crate::block::is_protected_spec;
use crate::core::types::IVec3;
use crate::plan::{Placement, PlacementSet};
use crate::world::{EffectSink, WorldAccessor};

/// Minimum and maximum blocks written per tick.
const MIN_RATE: usize = 10;
const MAX_RATE: usize = 200;

/// Progress effect cadence, in processed blocks.
const PROGRESS_EVERY: usize = 100;

/// Placer lifecycle. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacerState {
    Queued,
    Placing,
    Finalizing,
    Complete,
}

/// Counters accumulated across ticks. At `Complete`,
/// `processed == total` unless the world was torn down mid-run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacerStats {
    /// Placements consumed: placed, skipped, or failed.
    pub processed: usize,
    pub placed: usize,
    /// Positions left alone because a protected block occupies them.
    pub skipped_protected: usize,
    /// Writes the world rejected. Absorbed, never aborting.
    pub failed: usize,
    pub settled: usize,
    pub settle_failed: usize,
}

/// State machine that drains a placement set at a bounded rate.
#[derive(Debug)]
pub struct ProgressivePlacer {
    label: String,
    origin: IVec3,
    placements: Vec<Placement>,
    cursor: usize,
    rate: usize,
    state: PlacerState,
    stats: PlacerStats,
}

impl ProgressivePlacer {
    /// The per-tick rate scales with build size: one percent of the
    /// total, clamped so small builds still animate and huge ones
    /// cannot monopolize a tick.
    pub fn new(label: impl Into<String>, origin: IVec3, placements: PlacementSet) -> Self {
        let placements = placements.into_vec();
        let rate = (placements.len() / 100).clamp(MIN_RATE, MAX_RATE);
        Self {
            label: label.into(),
            origin,
            placements,
            cursor: 0,
            rate,
            state: PlacerState::Queued,
            stats: PlacerStats::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    pub fn state(&self) -> PlacerState {
        self.state
    }

    pub fn stats(&self) -> PlacerStats {
        self.stats
    }

    pub fn total(&self) -> usize {
        self.placements.len()
    }

    pub fn is_complete(&self) -> bool {
        self.state == PlacerState::Complete
    }

    /// Advance one tick. Returns the state after the tick.
    pub fn tick(
        &mut self,
        world: &mut impl WorldAccessor,
        effects: &mut impl EffectSink,
    ) -> PlacerState {
        if self.state == PlacerState::Complete {
            return self.state;
        }
        if !world.is_valid() {
            log::warn!(
                "build {}: world gone after {} of {} blocks, halting",
                self.label,
                self.stats.processed,
                self.total()
            );
            self.state = PlacerState::Complete;
            return self.state;
        }

        match self.state {
            PlacerState::Queued => {
                self.state = PlacerState::Placing;
                self.place_some(world, effects);
            }
            PlacerState::Placing => self.place_some(world, effects),
            PlacerState::Finalizing => self.finalize(world, effects),
            PlacerState::Complete => {}
        }
        self.state
    }

    fn place_some(&mut self, world: &mut impl WorldAccessor, effects: &mut impl EffectSink) {
        let end = (self.cursor + self.rate).min(self.placements.len());
        for i in self.cursor..end {
            let placement = &self.placements[i];
            if is_protected_spec(&world.get(placement.pos)) {
                self.stats.skipped_protected += 1;
            } else {
                match world.set(placement.pos, &placement.spec, false) {
                    Ok(()) => self.stats.placed += 1,
                    Err(e) => {
                        if self.stats.failed == 0 {
                            log::warn!("build {}: failed at {}: {e}", self.label, placement.pos);
                        }
                        self.stats.failed += 1;
                    }
                }
            }
            self.stats.processed += 1;
            if self.stats.processed % PROGRESS_EVERY == 0 {
                let fraction = self.stats.processed as f32 / self.placements.len() as f32;
                effects.progress(self.origin, fraction);
            }
        }
        self.cursor = end;
        if self.cursor == self.placements.len() {
            self.state = PlacerState::Finalizing;
        }
    }

    /// Settle every planned position still holding a block. Protected
    /// positions the placer skipped keep their original block, which
    /// deserves settling as much as a placed one.
    fn finalize(&mut self, world: &mut impl WorldAccessor, effects: &mut impl EffectSink) {
        for placement in &self.placements {
            if world.get(placement.pos).is_air() {
                continue;
            }
            match world.settle(placement.pos) {
                Ok(()) => self.stats.settled += 1,
                Err(e) => {
                    if self.stats.settle_failed == 0 {
                        log::warn!("build {}: settle failed at {}: {e}", self.label, placement.pos);
                    }
                    self.stats.settle_failed += 1;
                }
            }
        }
        log::info!(
            "build {}: complete, {} placed, {} skipped, {} failed, {} settled",
            self.label,
            self.stats.placed,
            self.stats.skipped_protected,
            self.stats.failed,
            self.stats.settled
        );
        effects.build_complete(&self.label, self.origin);
        self.state = PlacerState::Complete;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockSpec;
    use crate::world::GridWorld;

    #[derive(Default)]
    struct RecordingEffects {
        progress: Vec<f32>,
        completed: Vec<String>,
    }

    impl EffectSink for RecordingEffects {
        fn progress(&mut self, _origin: IVec3, fraction: f32) {
            self.progress.push(fraction);
        }

        fn build_complete(&mut self, label: &str, _origin: IVec3) {
            self.completed.push(label.to_string());
        }
    }

    fn stone_column(count: i32) -> PlacementSet {
        let stone = BlockSpec::parse("minecraft:stone").unwrap();
        PlacementSet::from_unordered(
            (0..count)
                .map(|i| Placement::new(IVec3::new(i % 16, 64 + i / 16, 0), stone.clone()))
                .collect(),
        )
    }

    fn run_to_completion(
        placer: &mut ProgressivePlacer,
        world: &mut GridWorld,
        effects: &mut RecordingEffects,
    ) -> usize {
        let mut ticks = 0;
        while !placer.is_complete() {
            placer.tick(world, effects);
            ticks += 1;
            assert!(ticks < 10_000, "placer never completed");
        }
        ticks
    }

    #[test]
    fn test_rate_scales_with_total() {
        assert_eq!(
            ProgressivePlacer::new("b", IVec3::ZERO, stone_column(5)).rate(),
            10
        );
        assert_eq!(
            ProgressivePlacer::new("b", IVec3::ZERO, stone_column(5_000)).rate(),
            50
        );
        assert_eq!(
            ProgressivePlacer::new("b", IVec3::ZERO, stone_column(100_000)).rate(),
            200
        );
    }

    #[test]
    fn test_small_build_places_everything() {
        let mut world = GridWorld::new();
        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("hut", IVec3::new(0, 64, 0), stone_column(7));

        run_to_completion(&mut placer, &mut world, &mut effects);
        let stats = placer.stats();
        assert_eq!(stats.processed, 7);
        assert_eq!(stats.placed, 7);
        assert_eq!(stats.failed, 0);
        assert_eq!(stats.settled, 7);
        assert_eq!(world.block_count(), 7);
        assert_eq!(effects.completed, vec!["hut".to_string()]);
    }

    #[test]
    fn test_rate_bounds_each_tick() {
        let mut world = GridWorld::new();
        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("big", IVec3::ZERO, stone_column(2_500));
        assert_eq!(placer.rate(), 25);

        placer.tick(&mut world, &mut effects);
        assert_eq!(placer.stats().processed, 25);
        assert_eq!(placer.state(), PlacerState::Placing);

        run_to_completion(&mut placer, &mut world, &mut effects);
        assert_eq!(placer.stats().processed, 2_500);
        assert_eq!(placer.stats().placed, 2_500);
        // Progress fires every 100 processed
        assert_eq!(effects.progress.len(), 25);
        assert!((effects.progress.last().unwrap() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_protected_positions_survive_placement() {
        let mut world = GridWorld::new();
        let chest = BlockSpec::parse("minecraft:chest[facing=north]").unwrap();
        let chest_pos = IVec3::new(0, 64, 0);
        world.set(chest_pos, &chest, false).unwrap();

        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("hut", IVec3::ZERO, stone_column(3));
        run_to_completion(&mut placer, &mut world, &mut effects);

        let stats = placer.stats();
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.placed, 2);
        assert_eq!(stats.skipped_protected, 1);
        // Skipped position keeps the chest and still gets settled
        assert_eq!(world.get(chest_pos), chest);
        assert_eq!(stats.settled, 3);
    }

    #[test]
    fn test_write_failures_absorbed() {
        let mut world = GridWorld::with_vertical_range(0, 64);
        let stone = BlockSpec::parse("minecraft:stone").unwrap();
        let placements = PlacementSet::from_unordered(vec![
            Placement::new(IVec3::new(0, 64, 0), stone.clone()),
            Placement::new(IVec3::new(0, 65, 0), stone.clone()),
            Placement::new(IVec3::new(1, 64, 0), stone),
        ]);

        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("hut", IVec3::ZERO, placements);
        run_to_completion(&mut placer, &mut world, &mut effects);

        let stats = placer.stats();
        assert_eq!(stats.processed, 3);
        assert_eq!(stats.placed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.settled, 2);
    }

    #[test]
    fn test_world_teardown_halts_early() {
        let mut world = GridWorld::new();
        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("big", IVec3::ZERO, stone_column(2_500));

        placer.tick(&mut world, &mut effects);
        world.invalidate();
        let state = placer.tick(&mut world, &mut effects);
        assert_eq!(state, PlacerState::Complete);
        assert!(placer.stats().processed < 2_500);
        // No completion effect for an aborted build
        assert!(effects.completed.is_empty());
    }

    #[test]
    fn test_tick_after_complete_is_a_noop() {
        let mut world = GridWorld::new();
        let mut effects = RecordingEffects::default();
        let mut placer = ProgressivePlacer::new("hut", IVec3::ZERO, stone_column(2));
        run_to_completion(&mut placer, &mut world, &mut effects);

        let stats = placer.stats();
        placer.tick(&mut world, &mut effects);
        assert_eq!(placer.stats(), stats);
        assert_eq!(effects.completed.len(), 1);
    }
}
