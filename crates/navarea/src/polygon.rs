use glam::Vec3;

use crate::edge::{Edge, EdgeId};

/// A chain of edges traced through their adjacency links.
///
/// The chain is not guaranteed to be closed or free of self-intersections.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Polygon {
    /// The edges in tracing order. Always more than two.
    pub edges: Vec<Edge>,
    /// The ids of [`Polygon::edges`] in the edge list the polygon was traced from.
    pub edge_ids: Vec<EdgeId>,
}

impl Polygon {
    /// The endpoints of all edges, without duplicates, in the order they are first met.
    pub fn vertices(&self) -> Vec<Vec3> {
        let mut vertices: Vec<Vec3> = Vec::with_capacity(self.edges.len() + 1);
        for point in self.edges.iter().flat_map(Edge::endpoints) {
            if !vertices.contains(&point) {
                vertices.push(point);
            }
        }
        vertices
    }
}

/// Traces connected edges into polygons.
///
/// Every edge not yet part of a chain starts a new one. From the current edge, the chain moves on
/// to the first connected edge that has not been visited, in adjacency order. It ends when there is
/// no such edge, or when that edge equals the chain's first edge, which is then not appended.
/// Chains with more than two edges become polygons, shorter ones are dropped.
///
/// The edges must have been connected with [`connect_edges`](crate::connect_edges).
pub fn build_polygons(edges: &[Edge]) -> Vec<Polygon> {
    let mut visited = vec![false; edges.len()];
    let mut polygons = Vec::new();

    for start in 0..edges.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut chain = vec![EdgeId(start as u32)];
        let mut current = start;

        loop {
            let next = edges[current]
                .connected()
                .iter()
                .copied()
                .find(|id| !visited[id.index()]);
            let Some(next) = next else {
                break;
            };
            if edges[next.index()] == edges[start] {
                // Looped back onto a copy of the starting edge
                break;
            }
            visited[next.index()] = true;
            chain.push(next);
            current = next.index();
        }

        if chain.len() > 2 {
            polygons.push(Polygon {
                edges: chain.iter().map(|id| edges[id.index()].clone()).collect(),
                edge_ids: chain,
            });
        } else {
            tracing::trace!("Dropping chain of {} edges starting at {start}", chain.len());
        }
    }
    polygons
}
