#![doc = include_str!("../../../readme.md")]

mod config;
mod contour;
mod debug_draw;
mod edge;
mod graph;
mod main_api;
pub(crate) mod math;
mod polygon;
mod simplify;
mod terrain;
mod voxel;
mod voxel_grid;

pub use config::{EndpointMatching, GridSize, NavAreaConfig, NavAreaConfigError};
pub use contour::{CellSide, CornerMask, MARCHING_SQUARES_TABLE};
pub use debug_draw::{DebugColor, DebugLineSink, NoopLineSink};
pub use edge::{Edge, EdgeId};
pub use graph::connect_edges;
pub use main_api::NavAreaContours;
pub use polygon::{Polygon, build_polygons};
pub use simplify::simplify_edges;
pub use terrain::{SurfaceHit, TerrainQuery};
pub use voxel::{Voxel, VoxelKey};
pub use voxel_grid::VoxelGrid;
