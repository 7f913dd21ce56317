//! Procedural dig shapes: hole, tunnel, staircase, shaft
//!
//! Pure generators parameterized by the requesting actor's position and
//! facing. Each returns the positions to clear (ordered bottom-to-top)
//! plus, for staircases, the stair blocks to place. Protection is
//! enforced at application time, not here.

use crate::block::spec::{BlockId, BlockSpec, Property};
use crate::core::types::{Cardinal, Facing, IVec3, Vertical};
use crate::math::BlockBounds;
use crate::plan::placement::{Placement, PlacementSet};

/// Vertical cells cleared above each staircase tread. The extra headroom
/// absorbs diagonal terrain intruding from adjacent steps.
const STAIR_HEADROOM: i32 = 5;

/// How far in front of the actor a dig begins.
const FORWARD_CLEARANCE: i32 = 2;

/// A planned dig: what to clear, what to place, and where it happened.
#[derive(Clone, Debug)]
pub struct DigPlan {
    /// Operation label for snapshots and logs, e.g. `dig_hole`.
    pub label: &'static str,
    /// Effect anchor (the actor position the dig was requested from).
    pub origin: IVec3,
    /// Positions to clear, sorted ascending by (y, x, z).
    pub clears: Vec<IVec3>,
    /// Stair placements (empty for every shape but the staircase).
    pub stairs: PlacementSet,
}

impl DigPlan {
    fn new(label: &'static str, origin: IVec3, mut clears: Vec<IVec3>, stairs: PlacementSet) -> Self {
        clears.sort_by_key(|p| (p.y, p.x, p.z));
        Self {
            label,
            origin,
            clears,
            stairs,
        }
    }

    /// Every position this dig will touch, clears first then stairs.
    pub fn touched_positions(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.clears.iter().copied().chain(self.stairs.positions())
    }

    pub fn bounds(&self) -> Option<BlockBounds> {
        BlockBounds::from_positions(self.touched_positions())
    }
}

/// A square hole dug straight down, offset forward of the actor so the
/// ground does not open up beneath them.
pub fn hole(actor: IVec3, facing: Cardinal, width: i32, depth: i32) -> DigPlan {
    let (fdx, fdz) = facing.offset();
    let forward = width / 2 + FORWARD_CLEARANCE;
    let center = IVec3::new(actor.x + fdx * forward, actor.y, actor.z + fdz * forward);
    let half = width / 2;

    let mut clears = Vec::with_capacity((width * width * depth) as usize);
    for dy in 0..depth {
        for dx in -half..-half + width {
            for dz in -half..-half + width {
                clears.push(IVec3::new(center.x + dx, center.y - dy, center.z + dz));
            }
        }
    }
    DigPlan::new("dig_hole", actor, clears, PlacementSet::default())
}

/// A horizontal passage extruded along a cardinal direction, starting
/// just in front of the actor. Width runs perpendicular to travel.
pub fn tunnel(
    actor: IVec3,
    facing: Cardinal,
    width: i32,
    height: i32,
    length: i32,
    direction: Cardinal,
) -> DigPlan {
    let (fdx, fdz) = facing.offset();
    let start = IVec3::new(
        actor.x + fdx * FORWARD_CLEARANCE,
        actor.y,
        actor.z + fdz * FORWARD_CLEARANCE,
    );
    let (ddx, ddz) = direction.offset();
    let (px, pz) = direction.perpendicular();
    let half = width / 2;

    let mut clears = Vec::with_capacity((width * height * length) as usize);
    for l in 0..length {
        for h in 0..height {
            for w in -half..-half + width {
                clears.push(IVec3::new(
                    start.x + ddx * l + px * w,
                    start.y + h,
                    start.z + ddz * l + pz * w,
                ));
            }
        }
    }
    DigPlan::new("dig_tunnel", actor, clears, PlacementSet::default())
}

/// A walkable staircase: one layer per step, each shifted one block
/// along `direction` and one level along `going`, with stair blocks at
/// tread level. Stairs face the direction a climber ascends into them,
/// so descending staircases face opposite to travel.
pub fn staircase(
    actor: IVec3,
    facing: Cardinal,
    width: i32,
    steps: i32,
    direction: Cardinal,
    going: Vertical,
) -> DigPlan {
    let (fdx, fdz) = facing.offset();
    let start = IVec3::new(
        actor.x + fdx * FORWARD_CLEARANCE,
        actor.y,
        actor.z + fdz * FORWARD_CLEARANCE,
    );
    let (ddx, ddz) = direction.offset();
    let (px, pz) = direction.perpendicular();
    let half = width / 2;

    let stair_facing = match going {
        Vertical::Down => direction.opposite().facing(),
        Vertical::Up => direction.facing(),
    };

    let mut clears = Vec::with_capacity((width * steps * STAIR_HEADROOM) as usize);
    let mut stairs = Vec::with_capacity((width * steps) as usize);
    for s in 0..steps {
        let tread_y = actor.y + going.sign() * s;
        for w in -half..-half + width {
            let x = start.x + ddx * s + px * w;
            let z = start.z + ddz * s + pz * w;
            for h in 0..STAIR_HEADROOM {
                clears.push(IVec3::new(x, tread_y + h, z));
            }
            stairs.push(Placement::new(
                IVec3::new(x, tread_y, z),
                stair_spec(stair_facing),
            ));
        }
    }
    DigPlan::new(
        "dig_staircase",
        actor,
        clears,
        PlacementSet::from_unordered(stairs),
    )
}

/// A vertical shaft centered on the actor, extruded up or down.
pub fn shaft(actor: IVec3, width: i32, length: i32, going: Vertical) -> DigPlan {
    let half = width / 2;
    let mut clears = Vec::with_capacity((width * width * length) as usize);
    for l in 0..length {
        let y = actor.y + going.sign() * l;
        for dx in -half..-half + width {
            for dz in -half..-half + width {
                clears.push(IVec3::new(actor.x + dx, y, actor.z + dz));
            }
        }
    }
    DigPlan::new("dig_shaft", actor, clears, PlacementSet::default())
}

fn stair_spec(facing: Facing) -> BlockSpec {
    BlockSpec::new(
        BlockId::known("minecraft:stone_stairs"),
        vec![
            Property::Facing(facing),
            Property::Other {
                key: "half".to_string(),
                value: "bottom".to_string(),
            },
            Property::Other {
                key: "shape".to_string(),
                value: "straight".to_string(),
            },
        ],
    )
}
