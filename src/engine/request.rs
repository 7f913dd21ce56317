//! Engine request types and pre-mutation validation
//!
//! These are the wire forms: a build names a blueprint, an origin, and a
//! rotation in degrees; a dig names a shape, its dimensions, and the
//! requesting actor's position and facing. Dimension limits are checked
//! here, before any world access.

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{Cardinal, IVec3, Result, Rotation, Vertical};
use crate::plan::{shapes, DigPlan};

/// Request to build a stored blueprint at an absolute origin.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildRequest {
    pub blueprint_id: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default)]
    pub rotation: Rotation,
}

impl BuildRequest {
    pub fn origin(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

/// Eight-way actor facing as reported by the request surface. Digs only
/// work with the four cardinals; diagonals collapse onto the
/// north/south axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing8 {
    #[default]
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

impl Facing8 {
    pub fn to_cardinal(self) -> Cardinal {
        match self {
            Facing8::North | Facing8::NorthEast | Facing8::NorthWest => Cardinal::North,
            Facing8::South | Facing8::SouthEast | Facing8::SouthWest => Cardinal::South,
            Facing8::East => Cardinal::East,
            Facing8::West => Cardinal::West,
        }
    }
}

/// Shape and dimensions of a dig.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum DigShape {
    Hole {
        width: i32,
        depth: i32,
    },
    Tunnel {
        width: i32,
        height: i32,
        length: i32,
        direction: Cardinal,
    },
    Staircase {
        width: i32,
        steps: i32,
        direction: Cardinal,
        going: Vertical,
    },
    Shaft {
        width: i32,
        length: i32,
        going: Vertical,
    },
}

/// Request to carve a shape relative to an actor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DigRequest {
    pub player_x: i32,
    pub player_y: i32,
    pub player_z: i32,
    #[serde(default)]
    pub player_facing: Facing8,
    #[serde(flatten)]
    pub shape: DigShape,
}

impl DigRequest {
    pub fn player_pos(&self) -> IVec3 {
        IVec3::new(self.player_x, self.player_y, self.player_z)
    }

    /// Expand the request into concrete clears and placements. Assumes
    /// dimensions were already validated against [`DigLimits`].
    pub fn plan(&self) -> DigPlan {
        let actor = self.player_pos();
        let facing = self.player_facing.to_cardinal();
        match self.shape {
            DigShape::Hole { width, depth } => shapes::hole(actor, facing, width, depth),
            DigShape::Tunnel {
                width,
                height,
                length,
                direction,
            } => shapes::tunnel(actor, facing, width, height, length, direction),
            DigShape::Staircase {
                width,
                steps,
                direction,
                going,
            } => shapes::staircase(actor, facing, width, steps, direction, going),
            DigShape::Shaft {
                width,
                length,
                going,
            } => shapes::shaft(actor, width, length, going),
        }
    }
}

/// Upper bounds on dig dimensions. Every dimension also has an implicit
/// lower bound of 1.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct DigLimits {
    pub max_width: i32,
    pub max_height: i32,
    pub max_depth: i32,
    pub max_length: i32,
    pub max_steps: i32,
}

impl Default for DigLimits {
    fn default() -> Self {
        Self {
            max_width: 16,
            max_height: 8,
            max_depth: 64,
            max_length: 64,
            max_steps: 64,
        }
    }
}

impl DigLimits {
    /// Reject out-of-range dimensions with [`Error::Request`]. Runs
    /// before any snapshot or mutation.
    pub fn validate(&self, shape: &DigShape) -> Result<()> {
        match *shape {
            DigShape::Hole { width, depth } => {
                check("width", width, self.max_width)?;
                check("depth", depth, self.max_depth)
            }
            DigShape::Tunnel {
                width,
                height,
                length,
                ..
            } => {
                check("width", width, self.max_width)?;
                check("height", height, self.max_height)?;
                check("length", length, self.max_length)
            }
            DigShape::Staircase { width, steps, .. } => {
                check("width", width, self.max_width)?;
                check("steps", steps, self.max_steps)
            }
            DigShape::Shaft { width, length, .. } => {
                check("width", width, self.max_width)?;
                check("length", length, self.max_length)
            }
        }
    }
}

fn check(name: &str, value: i32, max: i32) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::Request(format!(
            "{name} must be 1-{max}, got {value}"
        )))
    }
}
