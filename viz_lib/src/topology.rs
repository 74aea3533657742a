//! Radius-based neighbourhood queries over a snapshot.
//!
//! Plain pairwise checks in world space; snapshots hold at most a few
//! thousand nodes.

use common::snapshot::{Node, Snapshot};
use itertools::Itertools;

/// True when two nodes are within communication range of each other.
pub fn in_range(a: &Node, b: &Node, radius: f64) -> bool {
    radius > 0.0 && a.distance_to(b) <= radius
}

/// All other nodes within `radius` of `node`, in snapshot order.
pub fn neighbors<'a>(snapshot: &'a Snapshot, node: &Node, radius: f64) -> Vec<&'a Node> {
    snapshot
        .nodes
        .iter()
        .filter(|m| m.id != node.id && in_range(node, m, radius))
        .collect()
}

/// Every unordered node pair within `radius`. Empty when the radius is not
/// positive.
pub fn connectivity_edges(snapshot: &Snapshot, radius: f64) -> Vec<(&Node, &Node)> {
    if radius.is_nan() || radius <= 0.0 {
        return Vec::new();
    }
    snapshot
        .nodes
        .iter()
        .array_combinations::<2>()
        .filter(|[a, b]| in_range(a, b, radius))
        .map(|[a, b]| (a, b))
        .collect()
}
