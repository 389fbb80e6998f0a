use avian3d::prelude::*;
use bevy::prelude::*;
use navarea::{SurfaceHit, TerrainQuery};

/// Answers [`TerrainQuery`] probes with Avian's [`SpatialQuery`].
///
/// Probes are ray casts against solid colliders. Colliders that contain the ray origin are
/// ignored, so a probe starting inside a collider still finds the geometry beyond it.
/// Surface snapping casts a sphere and likewise ignores the colliders it starts in.
pub struct AvianTerrain<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
    filter: SpatialQueryFilter,
}

impl<'a, 'w, 's> AvianTerrain<'a, 'w, 's> {
    /// Queries all colliders.
    pub fn new(spatial_query: &'a SpatialQuery<'w, 's>) -> Self {
        Self {
            spatial_query,
            filter: SpatialQueryFilter::default(),
        }
    }

    /// Only queries colliders that pass `filter`.
    pub fn with_filter(mut self, filter: SpatialQueryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The configured filter, minus the colliders that contain `origin`.
    fn filter_at(&self, origin: Vec3) -> SpatialQueryFilter {
        let containing = self.spatial_query.point_intersections(origin, &self.filter);
        self.filter.clone().with_excluded_entities(containing)
    }

    fn cast_ray(&self, origin: Vec3, direction: Dir3, max_distance: f32) -> Option<RayHitData> {
        let filter = self.filter_at(origin);
        self.spatial_query
            .cast_ray(origin, direction, max_distance, true, &filter)
    }
}

impl TerrainQuery for AvianTerrain<'_, '_, '_> {
    fn probe_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let hit = self.cast_ray(origin, Dir3::NEG_Y, max_distance)?;
        Some(SurfaceHit {
            point: origin - Vec3::Y * hit.distance,
            normal: hit.normal,
        })
    }

    fn probe_direction(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3> {
        let direction = Dir3::new(direction).ok()?;
        let hit = self.cast_ray(origin, direction, max_distance)?;
        Some(hit.normal)
    }

    fn sphere_cast_down(&self, origin: Vec3, radius: f32, max_distance: f32) -> Option<Vec3> {
        let sphere = Collider::sphere(radius);
        let overlapping =
            self.spatial_query
                .shape_intersections(&sphere, origin, Quat::IDENTITY, &self.filter);
        let filter = self.filter.clone().with_excluded_entities(overlapping);
        let hit = self.spatial_query.cast_shape(
            &sphere,
            origin,
            Quat::IDENTITY,
            Dir3::NEG_Y,
            &ShapeCastConfig::from_max_distance(max_distance),
            &filter,
        )?;
        Some(hit.point1)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;
    use bevy::{
        ecs::system::RunSystemOnce, render::mesh::MeshPlugin, scene::ScenePlugin,
        time::TimeUpdateStrategy,
    };

    use super::*;

    /// A headless physics world with a 20×20 ground slab whose top is at y = 0.
    fn world_with_ground() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            AssetPlugin::default(),
            MeshPlugin,
            ScenePlugin,
            PhysicsPlugins::default(),
        ));
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            1.0 / 60.0,
        )));
        app.finish();
        app.cleanup();
        spawn_static_box(&mut app, Vec3::new(20.0, 1.0, 20.0), Vec3::new(0.0, -0.5, 0.0));
        app
    }

    fn spawn_static_box(app: &mut App, size: Vec3, center: Vec3) {
        app.world_mut().spawn((
            RigidBody::Static,
            Collider::cuboid(size.x, size.y, size.z),
            Transform::from_translation(center),
        ));
    }

    /// Lets the physics schedule register the colliders with the spatial query pipeline.
    fn settle(app: &mut App) {
        for _ in 0..5 {
            app.update();
        }
    }

    fn query<T: Send + 'static>(
        app: &mut App,
        f: impl Fn(&AvianTerrain) -> T + Send + Sync + 'static,
    ) -> T {
        app.world_mut()
            .run_system_once(move |spatial_query: SpatialQuery| {
                f(&AvianTerrain::new(&spatial_query))
            })
            .unwrap()
    }

    #[test]
    fn downward_ray_finds_ground() {
        let mut app = world_with_ground();
        settle(&mut app);
        let hit = query(&mut app, |terrain| {
            terrain.probe_down(Vec3::new(0.0, 2.0, 0.0), 3.0)
        })
        .unwrap();
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1.0e-2);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn downward_ray_out_of_reach_misses() {
        let mut app = world_with_ground();
        settle(&mut app);
        let hit = query(&mut app, |terrain| {
            terrain.probe_down(Vec3::new(0.0, 10.0, 0.0), 3.0)
        });
        assert!(hit.is_none());
    }

    #[test]
    fn downward_ray_starting_inside_a_collider_reaches_ground_below() {
        let mut app = world_with_ground();
        spawn_static_box(&mut app, Vec3::new(2.0, 1.0, 2.0), Vec3::new(0.0, 2.0, 0.0));
        settle(&mut app);
        let hit = query(&mut app, |terrain| {
            terrain.probe_down(Vec3::new(0.0, 2.0, 0.0), 3.0)
        })
        .unwrap();
        assert_relative_eq!(hit.point.y, 0.0, epsilon = 1.0e-2);
        assert_relative_eq!(hit.normal.y, 1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn lateral_ray_reports_wall_normal() {
        let mut app = world_with_ground();
        spawn_static_box(&mut app, Vec3::new(1.0, 6.0, 4.0), Vec3::new(0.7, 3.0, 0.0));
        settle(&mut app);
        let normal = query(&mut app, |terrain| {
            terrain.probe_direction(Vec3::new(-1.0, 3.0, 0.0), Vec3::X, 2.0)
        })
        .unwrap();
        assert_relative_eq!(normal.x, -1.0, epsilon = 1.0e-2);
    }

    #[test]
    fn lateral_ray_with_zero_direction_misses() {
        let mut app = world_with_ground();
        settle(&mut app);
        let normal = query(&mut app, |terrain| {
            terrain.probe_direction(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, 2.0)
        });
        assert!(normal.is_none());
    }

    #[test]
    fn sphere_cast_lands_on_ground() {
        let mut app = world_with_ground();
        settle(&mut app);
        let point = query(&mut app, |terrain| {
            terrain.sphere_cast_down(Vec3::new(0.0, 3.0, 0.0), 0.5, 50.0)
        })
        .unwrap();
        assert_relative_eq!(point.y, 0.0, epsilon = 1.0e-2);
    }

    #[test]
    fn sphere_cast_starting_against_a_wall_lands_on_ground() {
        let mut app = world_with_ground();
        // The wall's face is at x = 0.2, inside the sphere's starting radius.
        spawn_static_box(&mut app, Vec3::new(1.0, 6.0, 4.0), Vec3::new(0.7, 3.0, 0.0));
        settle(&mut app);
        let point = query(&mut app, |terrain| {
            terrain.sphere_cast_down(Vec3::new(0.0, 3.0, 0.0), 0.5, 50.0)
        })
        .unwrap();
        assert_relative_eq!(point.y, 0.0, epsilon = 1.0e-2);
    }
}
