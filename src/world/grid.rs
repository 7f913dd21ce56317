//! In-memory sparse voxel world
//!
//! Backs the test suite and headless deployments. Stores only non-air
//! blocks; everything else reads as air. Writes outside the vertical
//! range fail, which is also how tests exercise the engine's per-block
//! failure absorption.

use std::collections::HashMap;

use crate::block::BlockSpec;
use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use crate::world::WorldAccessor;

/// Default vertical range, matching a modern overworld.
const DEFAULT_MIN_Y: i32 = -64;
const DEFAULT_MAX_Y: i32 = 319;

/// Sparse, position-indexed world storage.
#[derive(Debug)]
pub struct GridWorld {
    blocks: HashMap<IVec3, BlockSpec>,
    min_y: i32,
    max_y: i32,
    settle_count: u64,
    notifying_writes: u64,
    valid: bool,
}

impl GridWorld {
    pub fn new() -> Self {
        Self::with_vertical_range(DEFAULT_MIN_Y, DEFAULT_MAX_Y)
    }

    /// World accepting writes only for `min_y..=max_y`.
    pub fn with_vertical_range(min_y: i32, max_y: i32) -> Self {
        Self {
            blocks: HashMap::new(),
            min_y,
            max_y,
            settle_count: 0,
            notifying_writes: 0,
            valid: true,
        }
    }

    /// Fill a cuboid with one block type. Test and world-setup helper;
    /// bypasses nothing (goes through `set`).
    pub fn fill(&mut self, min: IVec3, max: IVec3, spec: &BlockSpec) -> Result<()> {
        for y in min.y..=max.y {
            for x in min.x..=max.x {
                for z in min.z..=max.z {
                    self.set(IVec3::new(x, y, z), spec, false)?;
                }
            }
        }
        Ok(())
    }

    /// Number of non-air blocks stored.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// How many settle activations have run.
    pub fn settle_count(&self) -> u64 {
        self.settle_count
    }

    /// How many writes requested neighbor notification.
    pub fn notifying_writes(&self) -> u64 {
        self.notifying_writes
    }

    /// Simulate world-handle teardown: all further writes and settles
    /// fail and `is_valid` reports false.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldAccessor for GridWorld {
    fn get(&self, pos: IVec3) -> BlockSpec {
        self.blocks.get(&pos).cloned().unwrap_or_else(BlockSpec::air)
    }

    fn set(&mut self, pos: IVec3, spec: &BlockSpec, notify_neighbors: bool) -> Result<()> {
        if !self.valid {
            return Err(Error::WorldGone);
        }
        if pos.y < self.min_y || pos.y > self.max_y {
            return Err(Error::World(format!(
                "y={} outside world range {}..={}",
                pos.y, self.min_y, self.max_y
            )));
        }
        if notify_neighbors {
            self.notifying_writes += 1;
        }
        if spec.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, spec.clone());
        }
        Ok(())
    }

    fn settle(&mut self, pos: IVec3) -> Result<()> {
        if !self.valid {
            return Err(Error::WorldGone);
        }
        let _ = pos;
        self.settle_count += 1;
        Ok(())
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}
