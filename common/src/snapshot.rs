//! Snapshot payload served by `GET /api/state`.
//!
//! Every field is optional on the wire: an idle backend answers with little
//! more than an empty node list, so all structs default their fields instead
//! of failing the whole decode.

use crate::mapping::MappingInfo;
use crate::stats::SimStats;
use serde::{Deserialize, Deserializer, Serialize};

/// Node identifier, unique within one snapshot and stable across snapshots.
pub type NodeId = u64;

/// Fallback fill for nodes the backend did not colour.
pub const DEFAULT_NODE_COLOR: &str = "#FFA500";

/// Node category as reported by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NodeKind {
    #[default]
    Regular,
    Uav,
    Intruder,
}

impl NodeKind {
    /// Case-insensitive parse; unknown names map to `Regular`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "UAV" => NodeKind::Uav,
            "INTRUDER" => NodeKind::Intruder,
            _ => NodeKind::Regular,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Regular => "REGULAR",
            NodeKind::Uav => "UAV",
            NodeKind::Intruder => "INTRUDER",
        }
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.as_deref().map(NodeKind::from_name).unwrap_or_default())
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A point of a mobile node's recorded path, in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    /// `None` when the backend omitted the type; treated as regular for
    /// drawing, but trails colour untyped nodes like intruders.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mobile: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub track: Vec<TrackPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.kind.unwrap_or_default()
    }

    pub fn fill_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_NODE_COLOR)
    }

    /// World-space distance to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Packet currently in flight from `source` to every id in `dests`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Packet {
    pub source: NodeId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dests: Vec<NodeId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phase: f64,
}

impl Packet {
    /// Phase clamped to `[0, 1]`; non-finite values count as zero.
    pub fn clamped_phase(&self) -> f64 {
        if self.phase.is_finite() {
            self.phase.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Declared world dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Dim {
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: f64,
    #[serde(default)]
    pub area: Option<f64>,
}

/// Descriptive metadata of the loaded scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub field: Option<FieldInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radius_comm: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub simtime_max: f64,
    #[serde(default)]
    pub density: Option<f64>,
}

/// Playback state; `Back` replays events in reverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SimMode {
    Play,
    #[default]
    Pause,
    Back,
    #[serde(other)]
    Unknown,
}

impl SimMode {
    /// Whether the backend is advancing the timeline in either direction.
    pub fn is_running(self) -> bool {
        matches!(self, SimMode::Play | SimMode::Back)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub packet: Option<Packet>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub radius_comm: f64,
    #[serde(default)]
    pub dim: Option<Dim>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub idx: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mode: SimMode,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub stats: Option<SimStats>,
    #[serde(default)]
    pub mapping: Option<MappingInfo>,
}

impl Snapshot {
    /// Placeholder the client shows after the simulation is closed.
    pub fn closed() -> Self {
        Self {
            dim: Some(Dim::default()),
            ..Self::default()
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_nodes(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Decode a snapshot from the raw response body.
    pub fn from_json(body: &str) -> crate::error::WireResult<Self> {
        serde_json::from_str(body).map_err(Into::into)
    }
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
