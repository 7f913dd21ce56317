//! Quarter-turn geometry for blueprint placement
//!
//! Rotations are clockwise when viewed from above. They apply to both
//! relative block positions and the orientation-bearing block-state
//! values (`facing`, `axis`, sign `rotation`). Everything else passes
//! through unchanged.

use crate::core::types::{Axis, Facing, IVec3, Rotation};

/// Rotate a relative position by a quarter-turn multiple. The y axis is
/// never affected.
pub fn rotate_position(pos: IVec3, rotation: Rotation) -> IVec3 {
    match rotation {
        Rotation::None => pos,
        Rotation::Quarter => IVec3::new(-pos.z, pos.y, pos.x),
        Rotation::Half => IVec3::new(-pos.x, pos.y, -pos.z),
        Rotation::ThreeQuarter => IVec3::new(pos.z, pos.y, -pos.x),
    }
}

/// Rotate a `facing` value. Horizontal facings cycle
/// north -> east -> south -> west per quarter-turn; up and down pass
/// through unchanged.
pub fn rotate_facing(facing: Facing, rotation: Rotation) -> Facing {
    if !facing.is_horizontal() {
        return facing;
    }
    let mut facing = facing;
    for _ in 0..rotation.steps() {
        facing = match facing {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
            other => other,
        };
    }
    facing
}

/// Rotate an `axis` value: x and z swap on odd quarter-turns, a
/// half-turn maps each axis back onto itself.
pub fn rotate_axis(axis: Axis, rotation: Rotation) -> Axis {
    if rotation.steps() % 2 == 1 {
        match axis {
            Axis::X => Axis::Z,
            Axis::Z => Axis::X,
            Axis::Y => Axis::Y,
        }
    } else {
        axis
    }
}

/// Rotate a sign/banner `rotation` value (0-15): four increments per
/// quarter-turn, modulo 16.
pub fn rotate_sign_rotation(value: u8, rotation: Rotation) -> u8 {
    ((value as u32 + rotation.steps() * 4) % 16) as u8
}
