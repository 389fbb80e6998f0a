use std::ops::Deref;

use glam::Vec3;

use crate::config::EndpointMatching;

/// The index of an [`Edge`] in the edge list it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct EdgeId(pub u32);

impl Deref for EdgeId {
    type Target = u32;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<u32> for EdgeId {
    fn from(value: u32) -> Self {
        EdgeId(value)
    }
}

impl EdgeId {
    /// The id as an index into the edge list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An undirected world-space line segment on the boundary between walkable and non-walkable terrain.
///
/// Two edges are equal if they have the same endpoints in either order.
/// The adjacency list does not take part in the comparison.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    /// One endpoint.
    pub start: Vec3,
    /// The other endpoint.
    pub end: Vec3,
    /// Edges in the same list that share an endpoint with this one, in ascending order.
    /// Empty until the edges are connected.
    pub(crate) connected: Vec<EdgeId>,
}

impl Edge {
    /// Creates an edge without any connections.
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            connected: Vec::new(),
        }
    }

    /// The normalized direction from [`Edge::start`] to [`Edge::end`]. Zero for degenerate edges.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// The distance between the endpoints.
    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Edges in the same list that share an endpoint with this one.
    #[inline]
    pub fn connected(&self) -> &[EdgeId] {
        &self.connected
    }

    /// Whether both edges point the same way. Opposite directions do not count.
    #[inline]
    pub fn is_collinear(&self, other: &Edge) -> bool {
        const TOLERANCE: f32 = 0.001;
        (self.direction().dot(other.direction()) - 1.0).abs() < TOLERANCE
    }

    /// Whether any endpoint of `self` matches any endpoint of `other`.
    pub fn is_connected(&self, other: &Edge, matching: EndpointMatching) -> bool {
        let same = |a: Vec3, b: Vec3| match matching {
            EndpointMatching::Exact => a == b,
            EndpointMatching::Tolerant { epsilon } => a.distance_squared(b) <= epsilon * epsilon,
        };
        same(self.start, other.start)
            || same(self.start, other.end)
            || same(self.end, other.start)
            || same(self.end, other.end)
    }

    /// The endpoints as an array.
    #[inline]
    pub fn endpoints(&self) -> [Vec3; 2] {
        [self.start, self.end]
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.start == other.start && self.end == other.end)
            || (self.start == other.end && self.end == other.start)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const A: Vec3 = Vec3::new(0.0, 1.0, 0.0);
    const B: Vec3 = Vec3::new(2.0, 1.0, 0.0);
    const C: Vec3 = Vec3::new(2.0, 1.0, 3.0);

    #[test]
    fn equality_is_undirected() {
        let ab = Edge::new(A, B);
        let ba = Edge::new(B, A);
        assert_eq!(ab, ba);
        assert_eq!(ba, ab);
        assert_ne!(ab, Edge::new(A, C));
        assert_ne!(Edge::new(A, C), ab);
    }

    #[test]
    fn equality_ignores_connections() {
        let mut ab = Edge::new(A, B);
        ab.connected.push(EdgeId(3));
        assert_eq!(ab, Edge::new(B, A));
    }

    #[test]
    fn direction_and_length() {
        let edge = Edge::new(A, B);
        assert_eq!(edge.direction(), Vec3::X);
        assert_relative_eq!(edge.length(), 2.0);
        assert_eq!(Edge::new(A, A).direction(), Vec3::ZERO);
    }

    #[test]
    fn collinear_needs_same_direction() {
        let ab = Edge::new(A, B);
        assert!(ab.is_collinear(&Edge::new(B, B + Vec3::X * 5.0)));
        assert!(!ab.is_collinear(&Edge::new(B, A)));
        assert!(!ab.is_collinear(&Edge::new(B, C)));
        assert!(!ab.is_collinear(&Edge::new(A, A)));
    }

    #[test]
    fn connected_by_any_endpoint() {
        let ab = Edge::new(A, B);
        assert!(ab.is_connected(&Edge::new(B, C), EndpointMatching::Exact));
        assert!(ab.is_connected(&Edge::new(C, B), EndpointMatching::Exact));
        assert!(ab.is_connected(&Edge::new(C, A), EndpointMatching::Exact));
        assert!(!ab.is_connected(&Edge::new(C, C), EndpointMatching::Exact));
    }

    #[test]
    fn exact_matching_rejects_near_misses() {
        let ab = Edge::new(A, B);
        let nudged = Edge::new(B + Vec3::Y * 1.0e-5, C);
        assert!(!ab.is_connected(&nudged, EndpointMatching::Exact));
        assert!(ab.is_connected(&nudged, EndpointMatching::Tolerant { epsilon: 1.0e-3 }));
        assert!(!ab.is_connected(&nudged, EndpointMatching::Tolerant { epsilon: 1.0e-6 }));
    }

    #[test]
    fn signed_zero_endpoints_match_exactly() {
        let a = Edge::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ONE);
        let b = Edge::new(Vec3::new(-0.0, 0.0, 1.0), Vec3::NEG_ONE);
        assert!(a.is_connected(&b, EndpointMatching::Exact));
    }
}
