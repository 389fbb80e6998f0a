use std::ops::{Deref, DerefMut};

use glam::Vec3;
use slotmap::SlotMap;

slotmap::new_key_type! {
    /// A key for a [`Voxel`] stored in a [`VoxelGrid`](crate::VoxelGrid).
    pub struct VoxelKey;
}

/// A classified sample cell of the region.
///
/// Only the walkable flag can change after construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Voxel {
    /// World position of the cell's lattice corner.
    position: Vec3,
    /// Horizontal radius of the debug marker.
    radius: f32,
    /// Height of the debug marker.
    height: f32,
    /// Horizontal length of the debug marker. Always equal to the radius.
    length: f32,
    walkable: bool,
}

impl Voxel {
    /// The marker extents every sampled voxel is created with.
    pub(crate) const MARKER_EXTENT: f32 = 0.1;

    /// Creates a non-walkable voxel.
    pub fn new(position: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position,
            radius,
            height,
            length: radius,
            walkable: false,
        }
    }

    /// World position of the cell's lattice corner.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Horizontal radius of the voxel.
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Height of the voxel.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Horizontal length of the voxel. Always equal to [`Voxel::radius`].
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Whether an agent can stand in this cell.
    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    #[inline]
    pub(crate) fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }
}

/// Storage for the walkable voxels in insertion order.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub(crate) struct Voxels(SlotMap<VoxelKey, Voxel>);

impl Voxels {
    const DEFAULT_CAPACITY: usize = 1024;

    pub(crate) fn with_min_capacity(min_capacity: usize) -> Self {
        let capacity = min_capacity.max(Self::DEFAULT_CAPACITY);
        Self(SlotMap::with_capacity_and_key(capacity))
    }
}

impl Deref for Voxels {
    type Target = SlotMap<VoxelKey, Voxel>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Voxels {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_voxel_is_not_walkable() {
        let voxel = Voxel::new(Vec3::ONE, 0.1, 0.2);
        assert!(!voxel.is_walkable());
        assert_eq!(voxel.length(), voxel.radius());
        assert_eq!(voxel.height(), 0.2);
    }

    #[test]
    fn voxels_keep_insertion_order() {
        let mut voxels = Voxels::with_min_capacity(0);
        let positions = [Vec3::X, Vec3::Y, Vec3::Z];
        for position in positions {
            voxels.insert(Voxel::new(position, 0.1, 0.1));
        }
        let stored: Vec<_> = voxels.values().map(Voxel::position).collect();
        assert_eq!(stored, positions);
    }
}
