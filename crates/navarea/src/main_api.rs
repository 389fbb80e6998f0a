use glam::Vec3;

use crate::{
    config::{NavAreaConfig, NavAreaConfigError},
    debug_draw::{DebugColor, DebugLineSink, draw_wire_box},
    edge::Edge,
    graph::connect_edges,
    polygon::{Polygon, build_polygons},
    simplify::simplify_edges,
    terrain::TerrainQuery,
    voxel_grid::VoxelGrid,
};

/// The walkable boundary of a region, from sampling to polygons.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavAreaContours {
    /// The sampled voxels and the walkability of every column.
    pub voxels: VoxelGrid,
    /// The simplified contour edges, connected to each other.
    pub edges: Vec<Edge>,
    /// The polygons traced from [`NavAreaContours::edges`].
    pub polygons: Vec<Polygon>,
}

impl NavAreaContours {
    /// Samples the region described by `config` and turns its walkable boundary into polygons.
    ///
    /// Runs, in order:
    /// - [`VoxelGrid::build`] to classify the lattice,
    /// - [`VoxelGrid::extract_contours`] to trace the boundary with marching squares,
    /// - [`simplify_edges`] to merge neighboring collinear edges,
    /// - [`connect_edges`] with [`NavAreaConfig::endpoint_matching`],
    /// - [`build_polygons`].
    ///
    /// A region without any boundary, such as one with nothing under it, gives empty edges and polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid. In that case `terrain` is never queried.
    pub fn build(
        config: &NavAreaConfig,
        terrain: &impl TerrainQuery,
    ) -> Result<Self, NavAreaConfigError> {
        let voxels = VoxelGrid::build(config, terrain)?;

        let edges = voxels.extract_contours(config, terrain);
        let raw_edge_count = edges.len();
        let mut edges = simplify_edges(edges);
        tracing::debug!(
            "Simplified {raw_edge_count} contour edges into {}",
            edges.len()
        );

        let links = connect_edges(&mut edges, config.endpoint_matching);
        tracing::debug!("Connected {links} pairs of edges");

        let polygons = build_polygons(&edges);
        tracing::debug!("Traced {} polygons", polygons.len());

        Ok(Self {
            voxels,
            edges,
            polygons,
        })
    }

    /// Draws the outline of the sampled region in white, then every edge in red.
    pub fn draw_debug(&self, config: &NavAreaConfig, sink: &mut impl DebugLineSink) {
        draw_wire_box(
            sink,
            config.center,
            Vec3::new(config.width, config.height, config.length),
            DebugColor::WHITE,
        );
        for edge in &self.edges {
            sink.draw_line(edge.start, edge.end, DebugColor::RED);
        }
    }
}
