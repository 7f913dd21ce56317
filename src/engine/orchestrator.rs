//! The world task: single owner of all mutation
//!
//! One task owns the world, the undo history, and at most one active
//! progressive build. Requests arrive over a channel and are processed
//! strictly in order; blueprint loading and planning run off-task and
//! re-enter through the same channel, so the world is never touched from
//! two places at once.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::blueprint::store::{validate_blueprint_id, BlueprintStore};
use crate::build::{clear_bounds, clear_positions, ProgressivePlacer};
use crate::core::error::Error;
use crate::core::types::Result;
use crate::engine::request::{BuildRequest, DigLimits, DigRequest};
use crate::plan::{plan_blueprint, DigPlan, PlannedBuild};
use crate::undo::{self, Snapshot, UndoHistory};
use crate::world::{EffectSink, WorldAccessor};

/// Command channel depth. Senders briefly block when the world task
/// falls behind.
const COMMAND_BUFFER: usize = 64;

/// Engine tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct EngineConfig {
    /// Placement tick interval.
    pub quantum: Duration,
    pub dig_limits: DigLimits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quantum: Duration::from_millis(50),
            dig_limits: DigLimits::default(),
        }
    }
}

/// Point-in-time engine state, for polling callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineStatus {
    /// A build is placing or waiting to place.
    pub building: bool,
    /// Builds queued behind the active one.
    pub pending: usize,
    /// Snapshots currently undoable.
    pub history: usize,
}

enum EngineCommand {
    Build {
        request: BuildRequest,
        reply: oneshot::Sender<Result<()>>,
    },
    Planned {
        build: PlannedBuild,
    },
    Dig {
        request: DigRequest,
        reply: oneshot::Sender<Result<String>>,
    },
    Undo {
        reply: oneshot::Sender<String>,
    },
    Status {
        reply: oneshot::Sender<EngineStatus>,
    },
    Shutdown,
}

/// Cloneable client for a running [`Engine`]. All methods resolve once
/// the world task has acted on the request.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Queue a blueprint build. Resolves `Ok` once the blueprint is
    /// loaded, planned, and accepted; placement then proceeds over the
    /// following ticks.
    pub async fn build(&self, request: BuildRequest) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineCommand::Build { request, reply })
            .await
            .map_err(|_| Error::EngineStopped)?;
        rx.await.map_err(|_| Error::EngineStopped)?
    }

    /// Carve a dig shape. Digs apply in full before this resolves; the
    /// returned string summarizes what was mutated.
    pub async fn dig(&self, request: DigRequest) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineCommand::Dig { request, reply })
            .await
            .map_err(|_| Error::EngineStopped)?;
        rx.await.map_err(|_| Error::EngineStopped)?
    }

    /// Restore the most recent snapshot. Always resolves to a
    /// human-readable outcome, even when there is nothing to undo.
    pub async fn undo(&self) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineCommand::Undo { reply })
            .await
            .map_err(|_| Error::EngineStopped)?;
        rx.await.map_err(|_| Error::EngineStopped)
    }

    pub async fn status(&self) -> Result<EngineStatus> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(EngineCommand::Status { reply })
            .await
            .map_err(|_| Error::EngineStopped)?;
        rx.await.map_err(|_| Error::EngineStopped)
    }

    /// Stop the world task after the commands already queued.
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(EngineCommand::Shutdown)
            .await
            .map_err(|_| Error::EngineStopped)
    }
}

/// The world task state. Construct with [`Engine::new`], then drive it
/// with [`Engine::run`] on a runtime; interact through the returned
/// [`EngineHandle`].
pub struct Engine<W, S, E> {
    world: W,
    store: Arc<S>,
    effects: E,
    config: EngineConfig,
    history: UndoHistory,
    active: Option<ProgressivePlacer>,
    queued: VecDeque<PlannedBuild>,
    rx: mpsc::Receiver<EngineCommand>,
    /// Re-entry path for off-task planning.
    tx: mpsc::Sender<EngineCommand>,
}

impl<W, S, E> Engine<W, S, E>
where
    W: WorldAccessor + Send + 'static,
    S: BlueprintStore,
    E: EffectSink + Send + 'static,
{
    pub fn new(world: W, store: S, effects: E, config: EngineConfig) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let handle = EngineHandle { tx: tx.clone() };
        let engine = Self {
            world,
            store: Arc::new(store),
            effects,
            config,
            history: UndoHistory::new(),
            active: None,
            queued: VecDeque::new(),
            rx,
            tx,
        };
        (engine, handle)
    }

    /// Run until shutdown, then hand the engine back so the caller can
    /// inspect or reuse the world.
    pub async fn run(mut self) -> Self {
        let mut ticker = tokio::time::interval(self.config.quantum);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                command = self.rx.recv() => {
                    match command {
                        Some(EngineCommand::Shutdown) | None => break,
                        Some(command) => self.handle(command),
                    }
                }
                _ = ticker.tick() => self.tick(),
            }
        }
        self
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Build { request, reply } => self.handle_build(request, reply),
            EngineCommand::Planned { build } => self.handle_planned(build),
            EngineCommand::Dig { request, reply } => {
                let _ = reply.send(self.handle_dig(request));
            }
            EngineCommand::Undo { reply } => {
                let _ = reply.send(self.handle_undo());
            }
            EngineCommand::Status { reply } => {
                let _ = reply.send(EngineStatus {
                    building: self.active.is_some() || !self.queued.is_empty(),
                    pending: self.queued.len(),
                    history: self.history.len(),
                });
            }
            EngineCommand::Shutdown => {}
        }
    }

    /// Validate cheaply, then push load-and-plan off the world task. The
    /// planned build re-enters through the command channel.
    fn handle_build(&mut self, request: BuildRequest, reply: oneshot::Sender<Result<()>>) {
        if let Err(e) = validate_blueprint_id(&request.blueprint_id) {
            let _ = reply.send(Err(e));
            return;
        }
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let planned = store
                .load(&request.blueprint_id)
                .await
                .and_then(|blueprint| plan_blueprint(&blueprint, request.origin(), request.rotation));
            match planned {
                Ok(build) => {
                    let accepted = tx.send(EngineCommand::Planned { build }).await.is_ok();
                    let _ = reply.send(if accepted {
                        Ok(())
                    } else {
                        Err(Error::EngineStopped)
                    });
                }
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            }
        });
    }

    fn handle_planned(&mut self, build: PlannedBuild) {
        if self.active.is_some() {
            log::info!("build {}: queued behind active build", build.label);
            self.queued.push_back(build);
        } else {
            self.start_build(build);
        }
    }

    /// Snapshot, clear, then start progressive placement. The snapshot
    /// covers the full bounding box since clearing will.
    fn start_build(&mut self, build: PlannedBuild) {
        let snapshot = Snapshot::capture(&self.world, build.bounds.iter(), build.label.clone());
        self.history.push(snapshot);

        let cleared = clear_bounds(&mut self.world, build.bounds);
        log::info!(
            "build {}: cleared {} blocks, placing {} over ticks",
            build.label,
            cleared.cleared,
            build.placements.len()
        );
        self.effects.build_started(&build.label, build.origin);
        self.active = Some(ProgressivePlacer::new(
            build.label,
            build.origin,
            build.placements,
        ));
    }

    fn tick(&mut self) {
        let Some(placer) = &mut self.active else {
            return;
        };
        placer.tick(&mut self.world, &mut self.effects);
        if placer.is_complete() {
            self.active = None;
            if let Some(next) = self.queued.pop_front() {
                self.start_build(next);
            }
        }
    }

    /// Digs are small enough to apply in one pass: validate, snapshot,
    /// clear, place stairs if any.
    fn handle_dig(&mut self, request: DigRequest) -> Result<String> {
        self.config.dig_limits.validate(&request.shape)?;
        let plan: DigPlan = request.plan();

        let snapshot = Snapshot::capture(&self.world, plan.touched_positions(), plan.label);
        self.history.push(snapshot);

        let cleared = clear_positions(&mut self.world, plan.clears.iter().copied());
        let mut placed = 0usize;
        let mut place_failed = 0usize;
        for stair in plan.stairs.iter() {
            match self.world.set(stair.pos, &stair.spec, false) {
                Ok(()) => placed += 1,
                Err(e) => {
                    if place_failed == 0 {
                        log::warn!("{}: stair failed at {}: {e}", plan.label, stair.pos);
                    }
                    place_failed += 1;
                }
            }
        }
        self.effects.dig_started(plan.label, plan.origin);

        let mut summary = format!("{}: cleared {} blocks", plan.label, cleared.cleared);
        if placed > 0 {
            summary.push_str(&format!(", placed {placed} stairs"));
        }
        log::info!("{summary}");
        Ok(summary)
    }

    fn handle_undo(&mut self) -> String {
        match undo::undo(&mut self.history, &mut self.world) {
            Ok(report) => {
                self.effects.undo_complete(&report.label);
                report.to_string()
            }
            Err(Error::UndoEmpty) => "Nothing to undo.".to_string(),
            Err(e) => format!("Undo failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::store::MemoryBlueprintStore;
    use crate::blueprint::BlueprintEntry;
    use crate::block::BlockSpec;
    use crate::core::types::{Cardinal, IVec3, Rotation, Vertical};
    use crate::engine::request::{DigShape, Facing8};
    use crate::world::{GridWorld, LogEffects};

    fn hut_entries() -> Vec<BlueprintEntry> {
        let mut entries = Vec::new();
        for x in 0..3 {
            for z in 0..3 {
                entries.push(BlueprintEntry {
                    pos: [x, 0, z],
                    block: "minecraft:stone".to_string(),
                    properties: vec![],
                });
            }
        }
        entries.push(BlueprintEntry {
            pos: [1, 1, 1],
            block: "minecraft:oak_stairs".to_string(),
            properties: vec![("facing".to_string(), "north".to_string())],
        });
        entries
    }

    fn engine_with(
        world: GridWorld,
        blueprints: &[(&str, Vec<BlueprintEntry>)],
    ) -> (
        Engine<GridWorld, MemoryBlueprintStore, LogEffects>,
        EngineHandle,
    ) {
        crate::core::logging::try_init();
        let mut store = MemoryBlueprintStore::new();
        for (id, entries) in blueprints {
            store.insert(*id, entries.clone());
        }
        Engine::new(world, store, LogEffects, EngineConfig::default())
    }

    async fn wait_for_idle(handle: &EngineHandle) {
        while handle.status().await.unwrap().building {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_round_trip() {
        let (engine, handle) = engine_with(GridWorld::new(), &[("hut", hut_entries())]);
        let task = tokio::spawn(engine.run());

        handle
            .build(BuildRequest {
                blueprint_id: "hut".to_string(),
                x: 10,
                y: 64,
                z: 10,
                rotation: Rotation::None,
            })
            .await
            .unwrap();
        wait_for_idle(&handle).await;
        handle.shutdown().await.unwrap();

        let engine = task.await.unwrap();
        assert_eq!(engine.world().block_count(), 10);
        assert_eq!(
            engine.world().get(IVec3::new(10, 64, 10)),
            BlockSpec::parse("minecraft:stone").unwrap()
        );
        assert_eq!(engine.history().len(), 1);
        // Finalize settled every placed block
        assert_eq!(engine.world().settle_count(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_then_undo_restores_terrain() {
        let mut world = GridWorld::new();
        let dirt = BlockSpec::parse("minecraft:dirt").unwrap();
        world
            .fill(IVec3::new(10, 64, 10), IVec3::new(12, 65, 12), &dirt)
            .unwrap();
        let before = world.block_count();

        let (engine, handle) = engine_with(world, &[("hut", hut_entries())]);
        let task = tokio::spawn(engine.run());

        handle
            .build(BuildRequest {
                blueprint_id: "hut".to_string(),
                x: 10,
                y: 64,
                z: 10,
                rotation: Rotation::None,
            })
            .await
            .unwrap();
        wait_for_idle(&handle).await;

        let message = handle.undo().await.unwrap();
        assert!(message.starts_with("Undid hut ("), "got: {message}");
        handle.shutdown().await.unwrap();

        let engine = task.await.unwrap();
        assert_eq!(engine.world().block_count(), before);
        assert_eq!(
            engine.world().get(IVec3::new(11, 65, 11)),
            dirt,
            "terrain cleared for the build must come back"
        );
        assert!(engine.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_build_rejects_bad_ids_and_missing_blueprints() {
        let (engine, handle) = engine_with(GridWorld::new(), &[]);
        let task = tokio::spawn(engine.run());

        let err = handle
            .build(BuildRequest {
                blueprint_id: "../escape".to_string(),
                x: 0,
                y: 64,
                z: 0,
                rotation: Rotation::None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBlueprintId(_)));

        let err = handle
            .build(BuildRequest {
                blueprint_id: "missing".to_string(),
                x: 0,
                y: 64,
                z: 0,
                rotation: Rotation::None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BlueprintNotFound(_)));

        handle.shutdown().await.unwrap();
        let engine = task.await.unwrap();
        assert_eq!(engine.world().block_count(), 0);
        assert!(engine.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dig_hole_and_undo() {
        let mut world = GridWorld::new();
        let dirt = BlockSpec::parse("minecraft:dirt").unwrap();
        world
            .fill(IVec3::new(-10, 60, -10), IVec3::new(10, 70, 10), &dirt)
            .unwrap();
        let before = world.block_count();

        let (engine, handle) = engine_with(world, &[]);
        let task = tokio::spawn(engine.run());

        let summary = handle
            .dig(DigRequest {
                player_x: 0,
                player_y: 65,
                player_z: 0,
                player_facing: Facing8::North,
                shape: DigShape::Hole { width: 4, depth: 3 },
            })
            .await
            .unwrap();
        assert_eq!(summary, "dig_hole: cleared 48 blocks");

        let message = handle.undo().await.unwrap();
        assert!(message.starts_with("Undid dig_hole ("));
        handle.shutdown().await.unwrap();

        let engine = task.await.unwrap();
        assert_eq!(engine.world().block_count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dig_staircase_places_stairs() {
        let mut world = GridWorld::new();
        let dirt = BlockSpec::parse("minecraft:dirt").unwrap();
        world
            .fill(IVec3::new(-20, 50, -20), IVec3::new(20, 70, 20), &dirt)
            .unwrap();

        let (engine, handle) = engine_with(world, &[]);
        let task = tokio::spawn(engine.run());

        let summary = handle
            .dig(DigRequest {
                player_x: 0,
                player_y: 70,
                player_z: 0,
                player_facing: Facing8::North,
                shape: DigShape::Staircase {
                    width: 3,
                    steps: 10,
                    direction: Cardinal::North,
                    going: Vertical::Down,
                },
            })
            .await
            .unwrap();
        assert!(summary.contains("placed 30 stairs"), "got: {summary}");
        handle.shutdown().await.unwrap();

        let engine = task.await.unwrap();
        let stair = engine.world().get(IVec3::new(0, 70, -2));
        assert!(
            stair.to_string().starts_with("minecraft:stone_stairs["),
            "got: {stair}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dig_rejects_oversized_dimensions() {
        let (engine, handle) = engine_with(GridWorld::new(), &[]);
        let task = tokio::spawn(engine.run());

        let err = handle
            .dig(DigRequest {
                player_x: 0,
                player_y: 65,
                player_z: 0,
                player_facing: Facing8::North,
                shape: DigShape::Hole {
                    width: 40,
                    depth: 6,
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Request(_)));

        handle.shutdown().await.unwrap();
        let engine = task.await.unwrap();
        // Rejected before snapshot: nothing to undo
        assert!(engine.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_with_empty_history() {
        let (engine, handle) = engine_with(GridWorld::new(), &[]);
        let task = tokio::spawn(engine.run());

        assert_eq!(handle.undo().await.unwrap(), "Nothing to undo.");
        handle.shutdown().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_build_queues_behind_first() {
        let (engine, handle) =
            engine_with(GridWorld::new(), &[("hut", hut_entries())]);
        let task = tokio::spawn(engine.run());

        for origin_x in [0, 100] {
            handle
                .build(BuildRequest {
                    blueprint_id: "hut".to_string(),
                    x: origin_x,
                    y: 64,
                    z: 0,
                    rotation: Rotation::None,
                })
                .await
                .unwrap();
        }
        wait_for_idle(&handle).await;
        handle.shutdown().await.unwrap();

        let engine = task.await.unwrap();
        // Both builds landed, in separate snapshots
        assert_eq!(engine.world().block_count(), 20);
        assert_eq!(engine.history().len(), 2);
    }
}
