//! Text shown in the side panels, formatted from the current snapshot.
//!
//! Every value is a ready-to-display string; anything unknown is shown as
//! [`PLACEHOLDER`].

use crate::selection::SelectionInfo;
use common::mapping::Legend;
use common::snapshot::{Meta, Snapshot};
use common::stats::SimStats;

pub const PLACEHOLDER: &str = "—";
/// Gradient ends used when a continuous legend carries fewer than two colours.
const DEFAULT_GRADIENT: (&str, &str) = ("#cce", "#99f");

fn placeholder() -> String {
    PLACEHOLDER.to_string()
}

/// Playback position line.
#[derive(Debug, Clone, PartialEq)]
pub struct InfoView {
    pub time: String,
    pub event: String,
    pub playing: bool,
    pub speed: Option<f64>,
}

impl InfoView {
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            time: format!("Time: {:.2}", snapshot.time),
            event: format!("Event: {}/{}", snapshot.idx, snapshot.total),
            playing: snapshot.mode.is_running(),
            speed: snapshot.speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaView {
    pub description: String,
    pub size: String,
    pub nodes: String,
    pub density: String,
    pub radius: String,
    pub simtime: String,
    pub events: String,
}

impl Default for MetaView {
    fn default() -> Self {
        Self {
            description: placeholder(),
            size: placeholder(),
            nodes: placeholder(),
            density: placeholder(),
            radius: placeholder(),
            simtime: placeholder(),
            events: placeholder(),
        }
    }
}

impl MetaView {
    pub fn new(meta: Option<&Meta>) -> Self {
        let Some(m) = meta else {
            return Self::default();
        };
        let size = match m.field {
            Some(f) if f.width > 0.0 && f.height > 0.0 => format!("{} × {}", f.width, f.height),
            _ => placeholder(),
        };
        Self {
            description: if m.description.is_empty() {
                placeholder()
            } else {
                m.description.clone()
            },
            size,
            nodes: m.nodes_count.to_string(),
            density: m.density.map_or_else(placeholder, |d| format!("{d:.3e}")),
            radius: format!("{:.2}", m.radius_comm),
            simtime: format!("{:.2}", m.simtime_max),
            events: m.events_count.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsView {
    pub avg_degree: String,
    pub max_degree: String,
    pub components: String,
    pub packet_rate: String,
    /// `(label, count, share of the tallest bar)`.
    pub histogram: Vec<(String, u64, f64)>,
}

impl Default for StatsView {
    fn default() -> Self {
        Self {
            avg_degree: placeholder(),
            max_degree: placeholder(),
            components: placeholder(),
            packet_rate: placeholder(),
            histogram: Vec::new(),
        }
    }
}

impl StatsView {
    pub fn new(stats: Option<&SimStats>) -> Self {
        let Some(s) = stats else {
            return Self::default();
        };
        let peak = s.histogram_peak().max(1) as f64;
        Self {
            avg_degree: format!("{:.2}", s.avg_degree),
            max_degree: s.max_degree.to_string(),
            components: s.components.to_string(),
            packet_rate: format!("{:.3}", s.packet_rate),
            histogram: s
                .degree_hist
                .iter()
                .map(|&(degree, count)| (degree.to_string(), count, count as f64 / peak))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionView {
    pub id: String,
    pub kind: String,
    pub position: String,
    pub radius: String,
    pub neighbor_count: String,
    pub neighbors: String,
}

impl Default for SelectionView {
    fn default() -> Self {
        Self {
            id: placeholder(),
            kind: placeholder(),
            position: placeholder(),
            radius: placeholder(),
            neighbor_count: placeholder(),
            neighbors: placeholder(),
        }
    }
}

impl SelectionView {
    pub fn new(info: Option<&SelectionInfo>) -> Self {
        let Some(info) = info else {
            return Self::default();
        };
        Self {
            id: info.id.to_string(),
            kind: info.kind.clone(),
            position: format!("({:.1}, {:.1})", info.position.0, info.position.1),
            radius: format!("{:.2}", info.radius),
            neighbor_count: info.neighbor_count().to_string(),
            neighbors: info.neighbor_list(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegendView {
    Categorical {
        title: String,
        /// `(label, css colour)`.
        badges: Vec<(String, String)>,
    },
    Gradient {
        title: String,
        from: String,
        to: String,
        colors: (String, String),
    },
    Note {
        title: String,
        note: String,
    },
    Empty,
}

impl LegendView {
    pub fn new(legend: Option<&Legend>) -> Self {
        match legend {
            Some(Legend::Categorical { title, items }) => LegendView::Categorical {
                title: title.clone(),
                badges: items
                    .iter()
                    .map(|it| (it.label.clone(), it.color.clone()))
                    .collect(),
            },
            Some(Legend::Continuous {
                title,
                from,
                to,
                colors,
            }) => {
                let colors = match colors.as_slice() {
                    [a, b, ..] => (a.clone(), b.clone()),
                    _ => (
                        DEFAULT_GRADIENT.0.to_string(),
                        DEFAULT_GRADIENT.1.to_string(),
                    ),
                };
                LegendView::Gradient {
                    title: title.clone(),
                    from: from.clone(),
                    to: to.clone(),
                    colors,
                }
            }
            Some(Legend::Note { title, note }) => LegendView::Note {
                title: title.clone(),
                note: note.clone(),
            },
            Some(Legend::None) | None => LegendView::Empty,
        }
    }
}

/// Everything the panels show for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub info: InfoView,
    pub meta: MetaView,
    pub stats: StatsView,
    pub selection: SelectionView,
    pub legend: LegendView,
    /// Key of the active colour mapping.
    pub mapping: Option<String>,
}

impl PanelView {
    pub fn new(snapshot: &Snapshot, selection: Option<&SelectionInfo>) -> Self {
        let mapping = snapshot.mapping.as_ref();
        Self {
            info: InfoView::new(snapshot),
            meta: MetaView::new(snapshot.meta.as_ref()),
            stats: StatsView::new(snapshot.stats.as_ref()),
            selection: SelectionView::new(selection),
            legend: LegendView::new(mapping.and_then(|m| m.legend.as_ref())),
            mapping: mapping.map(|m| m.key.clone()).filter(|k| !k.is_empty()),
        }
    }
}
