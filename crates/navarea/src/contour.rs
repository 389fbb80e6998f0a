//! Marching squares over the dense walkability grid.
//!
//! Every 2×2 block of columns is turned into a corner mask, the mask selects zero, one or two
//! segments from [`MARCHING_SQUARES_TABLE`], and each segment endpoint is placed on the middle
//! of a block side, snapped down onto the terrain and lifted by a fixed clearance.

use glam::{Vec2, Vec3};

use crate::{
    config::NavAreaConfig, edge::Edge, terrain::TerrainQuery, voxel_grid::VoxelGrid,
};

/// The maximum distance a contour point is snapped down to reach the surface. `[Units: wu]`
const SNAP_DISTANCE: f32 = 50.0;

/// How far contour points are lifted above the surface they were snapped to. `[Units: wu]`
const CLEARANCE: f32 = 1.0;

bitflags::bitflags! {
    /// Which corners of a 2×2 block of columns are walkable.
    ///
    /// Bottom is the lower z, left the lower x.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    #[repr(transparent)]
    #[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
    pub struct CornerMask: u8 {
        /// The column at `(x, z)`.
        const BOTTOM_LEFT = 1;
        /// The column at `(x + 1, z)`.
        const BOTTOM_RIGHT = 2;
        /// The column at `(x + 1, z + 1)`.
        const TOP_RIGHT = 4;
        /// The column at `(x, z + 1)`.
        const TOP_LEFT = 8;
    }
}

impl CornerMask {
    /// The mask of the block whose bottom-left corner is the column `(x, z)`.
    pub fn at(grid: &VoxelGrid, x: u32, z: u32) -> Self {
        let mut mask = Self::empty();
        mask.set(Self::BOTTOM_LEFT, grid.is_walkable(x, z));
        mask.set(Self::BOTTOM_RIGHT, grid.is_walkable(x + 1, z));
        mask.set(Self::TOP_RIGHT, grid.is_walkable(x + 1, z + 1));
        mask.set(Self::TOP_LEFT, grid.is_walkable(x, z + 1));
        mask
    }

    /// The segments this mask produces, as consecutive pairs of block sides.
    #[inline]
    pub fn segments(self) -> &'static [CellSide] {
        MARCHING_SQUARES_TABLE[self.bits() as usize]
    }
}

/// A side of a 2×2 block. Segment endpoints sit on the middle of a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CellSide {
    /// The side at the block's lower x.
    Left = 0,
    /// The side at the block's lower z.
    Bottom = 1,
    /// The side at the block's upper x.
    Right = 2,
    /// The side at the block's upper z.
    Top = 3,
}

impl CellSide {
    /// The middle of this side of the block at `(x, z)`, in world units relative to the contour origin.
    #[inline]
    pub fn midpoint(self, x: u32, z: u32, cell_size: f32) -> Vec2 {
        let x = x as f32;
        let z = z as f32;
        match self {
            CellSide::Left => Vec2::new(x * cell_size, (z + 0.5) * cell_size),
            CellSide::Bottom => Vec2::new((x + 0.5) * cell_size, z * cell_size),
            CellSide::Right => Vec2::new((x + 1.0) * cell_size, (z + 0.5) * cell_size),
            CellSide::Top => Vec2::new((x + 0.5) * cell_size, (z + 1.0) * cell_size),
        }
    }
}

use CellSide::{Bottom, Left, Right, Top};

/// Maps a [`CornerMask`] to the block sides its segments connect, two sides per segment.
///
/// The saddle masks `0101` and `1010` always produce the same two segments, left-bottom and
/// right-top, without looking at the block center.
pub const MARCHING_SQUARES_TABLE: [&[CellSide]; 16] = [
    &[],                          // 0000
    &[Left, Bottom],              // 0001
    &[Bottom, Right],             // 0010
    &[Left, Right],               // 0011
    &[Right, Top],                // 0100
    &[Left, Bottom, Right, Top],  // 0101
    &[Bottom, Top],               // 0110
    &[Left, Top],                 // 0111
    &[Left, Top],                 // 1000
    &[Bottom, Top],               // 1001
    &[Left, Bottom, Right, Top],  // 1010
    &[Right, Top],                // 1011
    &[Left, Right],               // 1100
    &[Bottom, Right],             // 1101
    &[Left, Bottom],              // 1110
    &[],                          // 1111
];

impl VoxelGrid {
    /// Traces the boundary between walkable and non-walkable columns.
    ///
    /// Blocks are visited x outer, z inner, and their segments are appended in that order.
    /// Later stages depend on this order. Each endpoint is snapped onto the surface with a sphere
    /// cast of `agent_radius` that starts `agent_height` above it. If the cast misses, the
    /// unsnapped point is kept. Endpoints are then lifted by one unit.
    ///
    /// The grid dimensions come from the grid itself; `config` only supplies the contour origin
    /// and the agent dimensions.
    pub fn extract_contours(
        &self,
        config: &NavAreaConfig,
        terrain: &impl TerrainQuery,
    ) -> Vec<Edge> {
        let size = self.size();
        let origin = config.contour_origin();
        let mut edges = Vec::new();

        for x in 0..size.width.saturating_sub(1) {
            for z in 0..size.length.saturating_sub(1) {
                let mask = CornerMask::at(self, x, z);
                for sides in mask.segments().chunks_exact(2) {
                    let [start, end] = [sides[0], sides[1]].map(|side| {
                        let local = side.midpoint(x, z, config.agent_radius);
                        let flat = origin + Vec3::new(local.x, 0.0, local.y);
                        let mut point = snap_to_surface(flat, config, terrain);
                        point.y += CLEARANCE;
                        point
                    });
                    edges.push(Edge::new(start, end));
                }
            }
        }
        edges
    }
}

fn snap_to_surface(flat: Vec3, config: &NavAreaConfig, terrain: &impl TerrainQuery) -> Vec3 {
    terrain
        .sphere_cast_down(
            flat + Vec3::Y * config.agent_height,
            config.agent_radius,
            SNAP_DISTANCE,
        )
        .unwrap_or(flat)
}
