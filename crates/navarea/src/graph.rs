//! Endpoint-sharing adjacency between edges.

use std::collections::HashMap;

use glam::Vec3;

use crate::{
    config::EndpointMatching,
    edge::{Edge, EdgeId},
    math::exact_key,
};

/// Links every pair of distinct edges that share an endpoint.
///
/// Afterwards, [`Edge::connected`] lists the ids of all edges touching that edge, in ascending
/// order, and the relation is symmetric. Existing connections are replaced.
///
/// With [`EndpointMatching::Exact`], endpoints have to be identical; edges that only look like they
/// touch, for example because their endpoints were snapped to the surface separately, stay unlinked.
/// Polygon assembly follows these links, so this exactness shapes the resulting polygons.
///
/// Returns the number of linked pairs.
pub fn connect_edges(edges: &mut [Edge], matching: EndpointMatching) -> usize {
    let adjacency = match matching {
        EndpointMatching::Exact => exact_adjacency(edges),
        EndpointMatching::Tolerant { .. } => pairwise_adjacency(edges, matching),
    };
    let mut links = 0;
    for (edge, connected) in edges.iter_mut().zip(adjacency) {
        links += connected.len();
        edge.connected = connected;
    }
    links / 2
}

/// Compares every pair of edges.
fn pairwise_adjacency(edges: &[Edge], matching: EndpointMatching) -> Vec<Vec<EdgeId>> {
    edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            edges
                .iter()
                .enumerate()
                .filter(|&(j, other)| i != j && edge.is_connected(other, matching))
                .map(|(j, _)| EdgeId(j as u32))
                .collect()
        })
        .collect()
}

/// Buckets edges by the exact bits of their endpoints. Gives the same lists as the pairwise scan
/// with [`EndpointMatching::Exact`] without comparing every pair.
fn exact_adjacency(edges: &[Edge]) -> Vec<Vec<EdgeId>> {
    let mut buckets: HashMap<[u32; 3], Vec<EdgeId>> = HashMap::with_capacity(edges.len() * 2);
    for (i, edge) in edges.iter().enumerate() {
        let id = EdgeId(i as u32);
        for key in endpoint_keys(edge) {
            buckets.entry(key).or_default().push(id);
        }
    }

    edges
        .iter()
        .enumerate()
        .map(|(i, edge)| {
            let id = EdgeId(i as u32);
            let mut connected: Vec<EdgeId> = endpoint_keys(edge)
                .filter_map(|key| buckets.get(&key))
                .flatten()
                .copied()
                .filter(|other| *other != id)
                .collect();
            connected.sort_unstable();
            connected.dedup();
            connected
        })
        .collect()
}

/// The distinct exact keys of an edge's endpoints. Endpoints with a NaN coordinate have none.
fn endpoint_keys(edge: &Edge) -> impl Iterator<Item = [u32; 3]> {
    let [start, end]: [Vec3; 2] = edge.endpoints();
    let start = exact_key(start);
    let end = exact_key(end).filter(|end| Some(*end) != start);
    start.into_iter().chain(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(start: [f32; 3], end: [f32; 3]) -> Edge {
        Edge::new(Vec3::from_array(start), Vec3::from_array(end))
    }

    fn ids(edge: &Edge) -> Vec<u32> {
        edge.connected().iter().map(|id| id.0).collect()
    }

    fn square() -> Vec<Edge> {
        vec![
            edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            edge([1.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
            edge([5.0, 0.0, 5.0], [6.0, 0.0, 5.0]),
            edge([0.0, 0.0, 1.0], [1.0, 0.0, 1.0]),
            edge([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn links_shared_endpoints_in_index_order() {
        let mut edges = square();
        let links = connect_edges(&mut edges, EndpointMatching::Exact);
        assert_eq!(links, 4);
        assert_eq!(ids(&edges[0]), [1, 4]);
        assert_eq!(ids(&edges[1]), [0, 3]);
        assert!(edges[2].connected().is_empty());
        assert_eq!(ids(&edges[3]), [1, 4]);
        assert_eq!(ids(&edges[4]), [0, 3]);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mut edges = square();
        connect_edges(&mut edges, EndpointMatching::Exact);
        for (i, edge) in edges.iter().enumerate() {
            for other in edge.connected() {
                assert!(edges[other.index()].connected().contains(&EdgeId(i as u32)));
            }
        }
    }

    #[test]
    fn near_misses_stay_apart() {
        let mut edges = vec![
            edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            edge([1.0, 1.0e-6, 0.0], [2.0, 0.0, 0.0]),
        ];
        assert_eq!(connect_edges(&mut edges, EndpointMatching::Exact), 0);
        assert_eq!(
            connect_edges(&mut edges, EndpointMatching::Tolerant { epsilon: 1.0e-4 }),
            1
        );
        assert_eq!(ids(&edges[0]), [1]);
    }

    #[test]
    fn duplicates_and_double_contacts_link_once() {
        let mut edges = vec![
            edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
            edge([1.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            edge([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
        ];
        connect_edges(&mut edges, EndpointMatching::Exact);
        assert_eq!(ids(&edges[0]), [1, 2]);
        assert_eq!(ids(&edges[1]), [0, 2]);
        assert_eq!(ids(&edges[2]), [0, 1]);
    }

    #[test]
    fn hashed_matches_pairwise() {
        // A jagged staircase with repeated, reversed and signed-zero endpoints.
        let mut edges = Vec::new();
        for i in 0..12 {
            let x = (i % 4) as f32 * 0.5;
            let z = (i / 3) as f32 * 0.25;
            edges.push(edge([x, 0.0, z], [x + 0.5, 0.0, z]));
            edges.push(edge([x + 0.5, 0.0, z + 0.25], [x + 0.5, 0.0, z]));
        }
        edges.push(edge([-0.0, 0.0, 0.0], [0.0, 0.0, -0.0]));
        let hashed = exact_adjacency(&edges);
        let pairwise = pairwise_adjacency(&edges, EndpointMatching::Exact);
        assert_eq!(hashed, pairwise);
    }

    #[test]
    fn no_edges_no_links() {
        assert_eq!(connect_edges(&mut [], EndpointMatching::Exact), 0);
    }
}
