use std::mem;

use crate::edge::Edge;

/// Endpoints closer than this are considered touching when merging. `[Units: wu]`
const MERGE_GAP: f32 = 0.1;

/// Merges runs of collinear edges that follow each other in the list.
///
/// Only neighbors in list order are compared: an edge is merged into the running edge before it
/// if both point the same way and the running edge's end is within 0.1 units of its start.
/// The merged edge spans from the running edge's start to the new edge's end. Collinear edges
/// that are not list neighbors stay separate, so the result depends on the extraction order.
///
/// Adjacency is not carried over; connect the returned edges afresh.
pub fn simplify_edges(edges: Vec<Edge>) -> Vec<Edge> {
    let mut edges = edges.into_iter();
    let Some(mut current) = edges.next() else {
        return Vec::new();
    };
    let mut simplified = Vec::with_capacity(edges.len() + 1);
    for next in edges {
        if current.is_collinear(&next) && current.end.distance(next.start) < MERGE_GAP {
            current = Edge::new(current.start, next.end);
        } else {
            simplified.push(mem::replace(&mut current, next));
        }
    }
    simplified.push(current);
    for edge in &mut simplified {
        edge.connected.clear();
    }
    simplified
}
