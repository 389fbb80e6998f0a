//! The voxel grid module samples the region and classifies it into walkable and non-walkable cells.
//!
//! The region is split into a lattice of `agent_radius` × `agent_height` × `agent_radius` cells.
//! Every cell that can be stood on is kept in a sparse map, and every column of the lattice
//! gets a single walkability verdict in a dense grid that feeds the contour extraction.

use std::collections::HashMap;
use std::f32::consts::FRAC_1_SQRT_2;

use glam::{UVec3, Vec3};

use crate::{
    config::{GridSize, NavAreaConfig, NavAreaConfigError},
    math::slope_angle_degrees,
    terrain::TerrainQuery,
    voxel::{Voxel, VoxelKey, Voxels},
};

/// Sparse walkable voxels plus a dense per-column walkability grid.
/// Build with [`VoxelGrid::build`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelGrid {
    /// The lattice dimensions
    size: GridSize,
    /// All walkable voxels in sampling order
    voxels: Voxels,
    /// Lattice coordinates of the walkable voxels
    #[cfg_attr(feature = "serialize", serde(with = "lattice_serde"))]
    lattice: HashMap<UVec3, VoxelKey>,
    /// Walkability per column in width*length order
    walkable: Vec<bool>,
}

/// A sideways probe used to detect steep surfaces next to a cell.
struct LateralProbe {
    direction: Vec3,
    /// Added to the agent radius to get the probe length.
    reach_padding: f32,
}

impl LateralProbe {
    const fn new(x: f32, z: f32, reach_padding: f32) -> Self {
        Self {
            direction: Vec3::new(x, 0.0, z),
            reach_padding,
        }
    }
}

/// Evaluated in order. Only the first probe that hits anything is slope-tested.
const LATERAL_PROBES: [LateralProbe; 8] = [
    // Sides
    LateralProbe::new(1.0, 0.0, 0.1),
    LateralProbe::new(0.0, 1.0, 0.1),
    LateralProbe::new(0.0, -1.0, 0.1),
    LateralProbe::new(-1.0, 0.0, 0.1),
    // Diagonals
    LateralProbe::new(-FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.5),
    LateralProbe::new(-FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.5),
    LateralProbe::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2, 0.5),
    LateralProbe::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2, 0.5),
];

impl VoxelGrid {
    /// Samples the region described by `config` against `terrain`.
    ///
    /// The lattice is walked x outer, y middle, z inner. For each cell a ray is cast down from the
    /// cell's upper face over one agent height. Cells without a hit are skipped. Otherwise the
    /// cell is walkable unless the ground under it or the first surface found by a lateral probe
    /// is steeper than [`NavAreaConfig::walkable_angle`].
    ///
    /// The dense grid keeps the verdict of the last layer that hit something in a column.
    /// It is not an OR over the column, so a steep lower layer overrides a walkable upper one.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid. In that case `terrain` is never queried.
    pub fn build(
        config: &NavAreaConfig,
        terrain: &impl TerrainQuery,
    ) -> Result<Self, NavAreaConfigError> {
        let size = config.validate()?;
        Ok(Self::sample(config, size, terrain))
    }

    /// Creates a grid with no voxels whose column walkability is given by `walkable(x, z)`.
    ///
    /// Useful to drive contour extraction from walkability data that was computed elsewhere.
    pub fn from_walkable_fn(
        width: u32,
        length: u32,
        mut walkable: impl FnMut(u32, u32) -> bool,
    ) -> Self {
        let mut grid = Self::empty(GridSize {
            width,
            length,
            layers: 0,
        });
        for z in 0..length {
            for x in 0..width {
                let index = grid.column_index(x, z);
                grid.walkable[index] = walkable(x, z);
            }
        }
        grid
    }

    fn empty(size: GridSize) -> Self {
        Self {
            size,
            voxels: Voxels::with_min_capacity(0),
            lattice: HashMap::new(),
            walkable: vec![false; size.column_count()],
        }
    }

    pub(crate) fn sample(
        config: &NavAreaConfig,
        size: GridSize,
        terrain: &impl TerrainQuery,
    ) -> Self {
        let mut grid = Self::empty(size);
        let origin = config.lattice_origin();
        let cell_size = config.agent_radius;
        let cell_height = config.agent_height;

        for x in 0..size.width {
            for y in 0..size.layers {
                for z in 0..size.length {
                    let position = origin
                        + Vec3::new(
                            x as f32 * cell_size,
                            y as f32 * -cell_height,
                            z as f32 * cell_size,
                        );
                    let mut voxel =
                        Voxel::new(position, Voxel::MARKER_EXTENT, Voxel::MARKER_EXTENT);
                    let upper_face = position + Vec3::Y * cell_height * 0.5;

                    if let Some(ground) = terrain.probe_down(upper_face, cell_height) {
                        let walkable =
                            classify_cell(config, upper_face, ground.normal, terrain);
                        voxel.set_walkable(walkable);
                        let column = grid.column_index(x, z);
                        grid.walkable[column] = walkable;
                    }

                    if voxel.is_walkable() {
                        let key = grid.voxels.insert(voxel);
                        grid.lattice.insert(UVec3::new(x, y, z), key);
                    }
                }
            }
        }
        tracing::debug!(
            "Sampled {}x{}x{} cells, {} walkable voxels",
            size.width,
            size.layers,
            size.length,
            grid.voxels.len()
        );
        grid
    }

    #[inline]
    pub(crate) fn column_index(&self, x: u32, z: u32) -> usize {
        x as usize + z as usize * self.size.width as usize
    }

    /// The lattice dimensions.
    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Whether the column at `(x, z)` is walkable. `false` if the coordinates are out of bounds.
    #[inline]
    pub fn is_walkable(&self, x: u32, z: u32) -> bool {
        if x >= self.size.width || z >= self.size.length {
            return false;
        }
        self.walkable[self.column_index(x, z)]
    }

    /// Returns the key of the walkable voxel at the given lattice coordinates.
    /// `None` if the cell is not walkable or out of bounds.
    #[inline]
    pub fn voxel_key_at(&self, cell: UVec3) -> Option<VoxelKey> {
        self.lattice.get(&cell).copied()
    }

    /// Returns the walkable voxel at the given lattice coordinates.
    /// `None` if the cell is not walkable or out of bounds.
    #[inline]
    pub fn voxel_at(&self, cell: UVec3) -> Option<&Voxel> {
        let key = self.voxel_key_at(cell)?;
        self.voxels.get(key)
    }

    /// Returns the voxel with the given key, if it belongs to this grid.
    #[inline]
    pub fn voxel(&self, key: VoxelKey) -> Option<&Voxel> {
        self.voxels.get(key)
    }

    /// Iterates over all walkable voxels in sampling order.
    pub fn voxels(&self) -> impl Iterator<Item = &Voxel> {
        self.voxels.values()
    }

    /// The number of walkable voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Whether no voxel is walkable.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// The number of walkable columns in the dense grid.
    pub fn walkable_column_count(&self) -> usize {
        self.walkable.iter().filter(|walkable| **walkable).count()
    }
}

fn classify_cell(
    config: &NavAreaConfig,
    upper_face: Vec3,
    ground_normal: Vec3,
    terrain: &impl TerrainQuery,
) -> bool {
    let too_steep = |normal: Vec3| slope_angle_degrees(normal) > config.walkable_angle;
    let radius = config.agent_radius;

    // Only the first lateral surface found is looked at, even if a later one would be too steep.
    let lateral_normal = LATERAL_PROBES.iter().find_map(|probe| {
        terrain.probe_direction(
            upper_face + probe.direction * radius * 0.5,
            probe.direction,
            radius + probe.reach_padding,
        )
    });
    let steep_side = lateral_normal.is_some_and(too_steep);

    !steep_side && !too_steep(ground_normal)
}

/// Stores the lattice as a list of pairs sorted by cell, since formats like JSON only allow string map keys.
#[cfg(feature = "serialize")]
mod lattice_serde {
    use std::collections::HashMap;

    use glam::UVec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::voxel::VoxelKey;

    pub(super) fn serialize<S: Serializer>(
        lattice: &HashMap<UVec3, VoxelKey>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut pairs: Vec<(UVec3, VoxelKey)> =
            lattice.iter().map(|(cell, key)| (*cell, *key)).collect();
        pairs.sort_unstable_by_key(|(cell, _)| cell.to_array());
        pairs.serialize(serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<UVec3, VoxelKey>, D::Error> {
        let pairs = Vec::<(UVec3, VoxelKey)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}
