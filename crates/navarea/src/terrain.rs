//! The boundary between the generator and the world geometry.
//!
//! The generator never touches colliders directly. Every contact query goes through a
//! [`TerrainQuery`], which lets the same pipeline run against a physics engine, a heightmap,
//! or a hand-written mock.

use glam::Vec3;

/// A point on a surface together with the surface normal at that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// Where the probe touched the surface.
    pub point: Vec3,
    /// The surface normal at [`SurfaceHit::point`]. Does not need to be normalized.
    pub normal: Vec3,
}

/// Point, ray and sphere probes against world geometry.
///
/// All probes are blocking and are expected to be deterministic for an unchanged world.
pub trait TerrainQuery {
    /// Casts a ray straight down from `origin`. Returns the first surface within `max_distance`.
    fn probe_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit>;

    /// Casts a ray from `origin` along the normalized `direction`.
    /// Returns the normal of the first surface within `max_distance`.
    fn probe_direction(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Sweeps a sphere of `radius` straight down from `origin`.
    /// Returns the contact point with the first surface within `max_distance`.
    fn sphere_cast_down(&self, origin: Vec3, radius: f32, max_distance: f32) -> Option<Vec3>;
}

impl<T: TerrainQuery + ?Sized> TerrainQuery for &T {
    #[inline]
    fn probe_down(&self, origin: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        (**self).probe_down(origin, max_distance)
    }

    #[inline]
    fn probe_direction(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Vec3> {
        (**self).probe_direction(origin, direction, max_distance)
    }

    #[inline]
    fn sphere_cast_down(&self, origin: Vec3, radius: f32, max_distance: f32) -> Option<Vec3> {
        (**self).sphere_cast_down(origin, radius, max_distance)
    }
}
