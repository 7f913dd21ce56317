//! Axis-aligned bounding box over integer block positions

use crate::core::types::IVec3;

/// Axis-aligned bounding box defined by inclusive min and max corners
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockBounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl BlockBounds {
    /// Create bounds from min and max corners
    pub fn new(min: IVec3, max: IVec3) -> Self {
        Self { min, max }
    }

    /// Bounds containing a single position
    pub fn at(pos: IVec3) -> Self {
        Self { min: pos, max: pos }
    }

    /// Component-wise bounds over a set of positions.
    /// Returns None for an empty set.
    pub fn from_positions(positions: impl IntoIterator<Item = IVec3>) -> Option<Self> {
        let mut iter = positions.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::at(first);
        for pos in iter {
            bounds.expand(pos);
        }
        Some(bounds)
    }

    /// Get size per axis (inclusive, so a single block is 1x1x1)
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Number of block positions contained
    pub fn volume(&self) -> u64 {
        let size = self.size();
        size.x as u64 * size.y as u64 * size.z as u64
    }

    /// Check if a position is inside the bounds
    pub fn contains(&self, p: IVec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Expand bounds to include a position
    pub fn expand(&mut self, p: IVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Return merged bounds containing both
    pub fn merged(&self, other: &BlockBounds) -> BlockBounds {
        BlockBounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Iterate every contained position bottom-to-top: y-major, then x,
    /// then z. This is the materialization order used by clearing and
    /// snapshot capture.
    pub fn iter(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.x..=max.x).flat_map(move |x| {
                (min.z..=max.z).map(move |z| IVec3::new(x, y, z))
            })
        })
    }
}
