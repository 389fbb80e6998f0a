#![doc = include_str!("../../../readme.md")]

use avian3d::prelude::*;
use bevy::prelude::*;

mod terrain;

pub use navarea;
use navarea::{DebugColor, DebugLineSink, NavAreaConfig, NavAreaContours};

pub use crate::terrain::AvianTerrain;

/// Everything you need to get started with the nav area plugin.
pub mod prelude {
    pub use crate::{BuildNavArea, BuiltNavArea, NavArea, NavAreaGizmos, NavAreaPlugin};
}

/// The plugin of the crate. Builds the contours of a [`NavArea`] when [`BuildNavArea`] is triggered on it.
///
/// Requires Avian's spatial queries, which are part of [`PhysicsPlugins`].
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct NavAreaPlugin;

impl Plugin for NavAreaPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<NavArea>();
        app.register_type::<NavAreaGizmos>();
        app.init_resource::<NavAreaGizmos>();
        app.add_observer(build_nav_area);
        app.add_systems(
            Update,
            draw_nav_areas.run_if(|gizmos: Res<NavAreaGizmos>| gizmos.enabled),
        );
    }
}

/// A region whose walkable boundary should be traced.
///
/// The entity's [`GlobalTransform`] translation is used as [`NavAreaConfig::center`] when building.
/// Rotation and scale are ignored.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Deref, DerefMut)]
#[reflect(Component, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[require(Transform)]
pub struct NavArea(pub NavAreaConfig);

impl NavArea {
    /// The config with its center moved to where the entity is.
    pub fn config_at(&self, transform: &GlobalTransform) -> NavAreaConfig {
        self.0.clone().with_center(transform.translation())
    }
}

/// Trigger this on an entity with a [`NavArea`] to (re)build its contours.
///
/// The result is inserted as [`BuiltNavArea`]. The colliders have to be known to Avian's spatial
/// query pipeline by then, so trigger this after the physics schedule has run at least once.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct BuildNavArea;

/// The output of the last [`BuildNavArea`] on this entity.
#[derive(Component, Debug, Clone)]
pub struct BuiltNavArea {
    /// The config the contours were built with, centered on the entity.
    pub config: NavAreaConfig,
    /// The built voxels, edges and polygons.
    pub contours: NavAreaContours,
}

/// Whether built nav areas are drawn with gizmos.
#[derive(Resource, Debug, Clone, PartialEq, Reflect)]
#[reflect(Resource, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct NavAreaGizmos {
    /// Draw the region outline and the contour edges of every [`BuiltNavArea`].
    pub enabled: bool,
}

impl Default for NavAreaGizmos {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn build_nav_area(
    trigger: Trigger<BuildNavArea>,
    areas: Query<(&NavArea, &GlobalTransform)>,
    spatial_query: SpatialQuery,
    mut commands: Commands,
) {
    let entity = trigger.target();
    let Ok((area, transform)) = areas.get(entity) else {
        tracing::warn!("Cannot build nav area for {entity}: entity has no `NavArea`");
        return;
    };
    let config = area.config_at(transform);
    let terrain = AvianTerrain::new(&spatial_query);
    let contours = match NavAreaContours::build(&config, &terrain) {
        Ok(contours) => contours,
        Err(err) => {
            tracing::error!("Failed to build nav area for {entity}: {err}");
            return;
        }
    };
    tracing::debug!(
        "Built nav area for {entity}: {} edges, {} polygons",
        contours.edges.len(),
        contours.polygons.len()
    );
    commands
        .entity(entity)
        .insert(BuiltNavArea { config, contours });
}

fn draw_nav_areas(mut gizmos: Gizmos, areas: Query<&BuiltNavArea>) {
    let mut sink = GizmoLineSink(&mut gizmos);
    for area in &areas {
        area.contours.draw_debug(&area.config, &mut sink);
    }
}

/// Draws [`navarea`] debug lines with Bevy's immediate mode [`Gizmos`].
pub struct GizmoLineSink<'a, 'w, 's>(pub &'a mut Gizmos<'w, 's>);

impl DebugLineSink for GizmoLineSink<'_, '_, '_> {
    fn draw_line(&mut self, start: Vec3, end: Vec3, color: DebugColor) {
        self.0.line(start, end, to_bevy_color(color));
    }
}

fn to_bevy_color(color: DebugColor) -> Color {
    Color::linear_rgba(color.red, color.green, color.blue, color.alpha)
}
