use glam::Vec3;
use thiserror::Error;

#[cfg(feature = "bevy_reflect")]
use bevy_reflect::prelude::*;

/// Specifies the region to sample and the agent that has to walk it.
///
/// The region is an axis-aligned box of `width` (x) by `height` (y) by `length` (z) world units
/// around [`NavAreaConfig::center`]. The agent's footprint determines the sampling resolution:
/// columns are `agent_radius` wide on the xz-plane and layers are `agent_height` tall.
///
/// > Note:
/// >
/// > There is no separate cell size. To sample more finely, use a smaller agent radius.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub struct NavAreaConfig {
    /// The center of the sampled region. `[Units: wu]`
    pub center: Vec3,

    /// The extent of the region along the x-axis. `[Limit: > 0] [Units: wu]`
    pub width: f32,

    /// The extent of the region along the z-axis. `[Limit: > 0] [Units: wu]`
    pub length: f32,

    /// The extent of the region along the y-axis. `[Limit: > 0] [Units: wu]`
    pub height: f32,

    /// The radius of the agent. `[Limit: > 0] [Units: wu]`
    ///
    /// Used as the xz-plane cell size of the sampling grid and as the reach of the lateral slope probes.
    pub agent_radius: f32,

    /// The height of the agent. `[Limit: > 0] [Units: wu]`
    ///
    /// Used as the y-axis cell size of the sampling lattice and as the length of the downward probe.
    pub agent_height: f32,

    /// The maximum slope that is considered walkable. `[Limits: 0 <= value <= 180] [Units: Degrees]`
    ///
    /// Measured as the angle between a surface normal and the world's up vector.
    pub walkable_angle: f32,

    /// How edge endpoints are compared when computing adjacency.
    pub endpoint_matching: EndpointMatching,
}

impl NavAreaConfig {
    /// The walkable angle used by [`NavAreaConfig::new`].
    pub const DEFAULT_WALKABLE_ANGLE: f32 = 45.0;

    /// Creates a config for a region centered at the origin, with a walkable angle of 45°
    /// and exact endpoint matching.
    pub fn new(width: f32, length: f32, height: f32, agent_radius: f32, agent_height: f32) -> Self {
        Self {
            center: Vec3::ZERO,
            width,
            length,
            height,
            agent_radius,
            agent_height,
            walkable_angle: Self::DEFAULT_WALKABLE_ANGLE,
            endpoint_matching: EndpointMatching::Exact,
        }
    }

    /// Moves the region so that it is centered at `center`.
    pub fn with_center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Sets the maximum walkable slope in degrees.
    pub fn with_walkable_angle(mut self, walkable_angle: f32) -> Self {
        self.walkable_angle = walkable_angle;
        self
    }

    /// Sets how edge endpoints are compared when computing adjacency.
    pub fn with_endpoint_matching(mut self, endpoint_matching: EndpointMatching) -> Self {
        self.endpoint_matching = endpoint_matching;
        self
    }

    /// The corner the sampling lattice grows from: minimum x and z, maximum y.
    #[inline]
    pub fn lattice_origin(&self) -> Vec3 {
        self.center + Vec3::new(-self.width, self.height, -self.length) / 2.0
    }

    /// The corner contour points are laid out from: minimum x and z, at the center's height.
    #[inline]
    pub fn contour_origin(&self) -> Vec3 {
        self.center + Vec3::new(-self.width, 0.0, -self.length) / 2.0
    }

    /// Checks the config and derives the lattice dimensions from it.
    ///
    /// # Errors
    ///
    /// Returns an error if any extent or agent dimension is not a positive finite number,
    /// if the walkable angle or the center is invalid, or if the lattice would be too large to address.
    pub fn validate(&self) -> Result<GridSize, NavAreaConfigError> {
        if !self.center.is_finite() {
            return Err(NavAreaConfigError::NonFiniteCenter {
                center: self.center,
            });
        }
        for (name, value) in [
            ("width", self.width),
            ("length", self.length),
            ("height", self.height),
        ] {
            if !is_positive_finite(value) {
                return Err(NavAreaConfigError::NonPositiveExtent { name, value });
            }
        }
        for (name, value) in [
            ("agent_radius", self.agent_radius),
            ("agent_height", self.agent_height),
        ] {
            if !is_positive_finite(value) {
                return Err(NavAreaConfigError::NonPositiveAgentSize { name, value });
            }
        }
        if !(0.0..=180.0).contains(&self.walkable_angle) {
            return Err(NavAreaConfigError::InvalidWalkableAngle {
                angle: self.walkable_angle,
            });
        }
        if let EndpointMatching::Tolerant { epsilon } = self.endpoint_matching {
            if !(epsilon.is_finite() && epsilon >= 0.0) {
                return Err(NavAreaConfigError::InvalidEpsilon { epsilon });
            }
        }

        let width = self.width / self.agent_radius;
        let length = self.length / self.agent_radius;
        let layers = self.height / self.agent_height;
        if [width, length, layers]
            .into_iter()
            .any(|cells| !cells.is_finite() || cells >= u32::MAX as f32)
        {
            return Err(NavAreaConfigError::GridTooLarge {
                width,
                length,
                layers,
            });
        }
        // Truncation is the cell count rule: partial cells at the far edges are not sampled.
        let size = GridSize {
            width: width as u32,
            length: length as u32,
            layers: layers as u32,
        };
        let cell_count = size.width as u128 * size.length as u128 * size.layers as u128;
        if cell_count > usize::MAX as u128 {
            return Err(NavAreaConfigError::GridTooLarge {
                width,
                length,
                layers,
            });
        }
        Ok(size)
    }
}

#[inline]
fn is_positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// How two edge endpoints are decided to be the same point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bevy_reflect", derive(Reflect))]
#[cfg_attr(
    all(feature = "serialize", feature = "bevy_reflect"),
    reflect(Serialize, Deserialize)
)]
pub enum EndpointMatching {
    /// Endpoints match only if they are bit-identical (with `0.0 == -0.0`).
    ///
    /// Edges whose endpoints were snapped to the surface independently can end up a hair apart
    /// and will then not be linked. Polygon assembly depends on this exactness.
    #[default]
    Exact,
    /// Endpoints match if they are at most `epsilon` world units apart.
    Tolerant {
        /// The maximum distance between matching endpoints. `[Limit: >= 0] [Units: wu]`
        epsilon: f32,
    },
}

/// The number of cells of the sampling lattice along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    /// Cells along the x-axis.
    pub width: u32,
    /// Cells along the z-axis.
    pub length: u32,
    /// Layers along the y-axis.
    pub layers: u32,
}

impl GridSize {
    /// The number of columns on the xz-plane.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.width as usize * self.length as usize
    }
}

/// Errors that can occur when validating a [`NavAreaConfig`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NavAreaConfigError {
    /// Happens when a region extent is zero, negative, NaN or infinite.
    #[error("Region {name} must be a positive finite number, got {value}")]
    NonPositiveExtent {
        /// The name of the offending field.
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// Happens when the agent radius or height is zero, negative, NaN or infinite.
    #[error("Agent dimension {name} must be a positive finite number, got {value}")]
    NonPositiveAgentSize {
        /// The name of the offending field.
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// Happens when the walkable angle is outside of `[0, 180]` degrees.
    #[error("Walkable angle must be within [0, 180] degrees, got {angle}")]
    InvalidWalkableAngle {
        /// The offending angle in degrees.
        angle: f32,
    },
    /// Happens when the region center has a NaN or infinite coordinate.
    #[error("Region center must be finite, got {center}")]
    NonFiniteCenter {
        /// The offending center.
        center: Vec3,
    },
    /// Happens when the tolerance of [`EndpointMatching::Tolerant`] is negative or not finite.
    #[error("Endpoint matching tolerance must be a non-negative finite number, got {epsilon}")]
    InvalidEpsilon {
        /// The offending tolerance.
        epsilon: f32,
    },
    /// Happens when the lattice has too many cells to be addressed.
    #[error("Sampling lattice is too large, got {width}*{length}*{layers} cells")]
    GridTooLarge {
        /// Cells along the x-axis before truncation.
        width: f32,
        /// Cells along the z-axis before truncation.
        length: f32,
        /// Layers along the y-axis before truncation.
        layers: f32,
    },
}
