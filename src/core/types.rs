//! Core type aliases and direction/rotation types

use serde::{Deserialize, Serialize};

pub use glam::IVec3;

/// Standard Result type for the engine
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Clockwise quarter-turn rotation applied to blueprint builds.
///
/// Serialized as degrees (0, 90, 180, 270), matching the wire form of
/// build requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    None,
    Quarter,
    Half,
    ThreeQuarter,
}

impl Rotation {
    /// Number of clockwise quarter-turns (0-3).
    pub fn steps(self) -> u32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 1,
            Rotation::Half => 2,
            Rotation::ThreeQuarter => 3,
        }
    }

    /// Rotation in degrees.
    pub fn degrees(self) -> u16 {
        self.steps() as u16 * 90
    }

    /// The rotation that undoes this one.
    pub fn inverse(self) -> Self {
        match self {
            Rotation::None => Rotation::None,
            Rotation::Quarter => Rotation::ThreeQuarter,
            Rotation::Half => Rotation::Half,
            Rotation::ThreeQuarter => Rotation::Quarter,
        }
    }

    /// Parse from degrees. Only exact quarter-turn multiples are valid.
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 | 360 => Some(Rotation::None),
            90 => Some(Rotation::Quarter),
            180 => Some(Rotation::Half),
            270 => Some(Rotation::ThreeQuarter),
            _ => None,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> std::result::Result<Self, String> {
        Rotation::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

/// Horizontal cardinal direction in block space.
///
/// Convention matches the world grid: +x is east, +z is south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cardinal {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Cardinal {
    /// Unit (dx, dz) offset for one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Cardinal::North => (0, -1),
            Cardinal::South => (0, 1),
            Cardinal::East => (1, 0),
            Cardinal::West => (-1, 0),
        }
    }

    /// Unit (dx, dz) offset perpendicular to this direction (90 degrees
    /// clockwise). Tunnel and staircase width runs along this axis.
    pub fn perpendicular(self) -> (i32, i32) {
        let (dx, dz) = self.offset();
        (-dz, dx)
    }

    pub fn opposite(self) -> Self {
        match self {
            Cardinal::North => Cardinal::South,
            Cardinal::South => Cardinal::North,
            Cardinal::East => Cardinal::West,
            Cardinal::West => Cardinal::East,
        }
    }

    /// Block-state facing value for this direction.
    pub fn facing(self) -> Facing {
        match self {
            Cardinal::North => Facing::North,
            Cardinal::South => Facing::South,
            Cardinal::East => Facing::East,
            Cardinal::West => Facing::West,
        }
    }
}

/// Vertical travel for shafts and staircases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    /// +1 for up, -1 for down.
    pub fn sign(self) -> i32 {
        match self {
            Vertical::Up => 1,
            Vertical::Down => -1,
        }
    }
}

/// Value of a `facing` block-state property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Facing {
    pub fn as_str(self) -> &'static str {
        match self {
            Facing::North => "north",
            Facing::East => "east",
            Facing::South => "south",
            Facing::West => "west",
            Facing::Up => "up",
            Facing::Down => "down",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "north" => Some(Facing::North),
            "east" => Some(Facing::East),
            "south" => Some(Facing::South),
            "west" => Some(Facing::West),
            "up" => Some(Facing::Up),
            "down" => Some(Facing::Down),
            _ => None,
        }
    }

    /// True for the four horizontal facings.
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Facing::Up | Facing::Down)
    }
}

/// Value of an `axis` block-state property (logs, pillars).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "x" => Some(Axis::X),
            "y" => Some(Axis::Y),
            "z" => Some(Axis::Z),
            _ => None,
        }
    }
}
