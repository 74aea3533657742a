use crate::topology::neighbors;
use crate::viewport::Viewport;
use common::snapshot::{Node, NodeId, Snapshot};

/// Smallest click tolerance in screen pixels.
pub const MIN_PICK_RADIUS: f64 = 8.0;
/// Neighbour ids listed in the selection panel before eliding.
pub const MAX_LISTED_NEIGHBORS: usize = 20;

/// Click tolerance for a given node display radius.
pub fn pick_radius(node_size: f64) -> f64 {
    MIN_PICK_RADIUS.max(node_size + 6.0)
}

/// Nearest node whose screen position lies within the pick radius of
/// `(sx, sy)`. The first node wins on equal distances.
pub fn pick_node<'a>(
    snapshot: &'a Snapshot,
    viewport: &Viewport,
    sx: f64,
    sy: f64,
    node_size: f64,
) -> Option<&'a Node> {
    let tolerance = pick_radius(node_size);
    let mut best: Option<(&Node, f64)> = None;
    for node in &snapshot.nodes {
        let (nx, ny) = viewport.world_to_screen(node.x, node.y);
        let d = (nx - sx).hypot(ny - sy);
        if d > tolerance {
            continue;
        }
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((node, d));
        }
    }
    best.map(|(node, _)| node)
}

/// The single selected node, tracked by id across snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection(Option<NodeId>);

impl Selection {
    pub fn id(&self) -> Option<NodeId> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn select(&mut self, id: Option<NodeId>) {
        self.0 = id;
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Look the selected node up in `snapshot`; a node that no longer exists
    /// clears the selection.
    pub fn resolve<'a>(&mut self, snapshot: &'a Snapshot) -> Option<&'a Node> {
        let id = self.0?;
        let node = snapshot.node(id);
        if node.is_none() {
            tracing::debug!(id, "Selected node vanished, clearing selection");
            self.0 = None;
        }
        node
    }
}

/// What the selection panel shows about the selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionInfo {
    pub id: NodeId,
    pub kind: String,
    pub position: (f64, f64),
    pub radius: f64,
    pub neighbor_ids: Vec<NodeId>,
}

impl SelectionInfo {
    pub fn collect(snapshot: &Snapshot, node: &Node) -> Self {
        let radius = snapshot.radius_comm;
        Self {
            id: node.id,
            kind: node.kind().to_string(),
            position: (node.x, node.y),
            radius,
            neighbor_ids: neighbors(snapshot, node, radius)
                .iter()
                .map(|n| n.id)
                .collect(),
        }
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbor_ids.len()
    }

    /// `(1, 2, 3)`, truncated to the first ids with a trailing ellipsis.
    pub fn neighbor_list(&self) -> String {
        let shown = self
            .neighbor_ids
            .iter()
            .take(MAX_LISTED_NEIGHBORS)
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        if self.neighbor_ids.len() > MAX_LISTED_NEIGHBORS {
            format!("({shown}, …)")
        } else {
            format!("({shown})")
        }
    }
}
