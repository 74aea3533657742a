//! Fixtures and a recording [`Surface`] shared by unit and integration
//! tests.

use crate::render::{Point, Stroke, Surface};
use common::snapshot::{Node, NodeId, NodeKind, Snapshot, TrackPoint};

pub fn node(id: NodeId, x: f64, y: f64) -> Node {
    Node {
        id,
        x,
        y,
        ..Node::default()
    }
}

/// A mobile node that has moved through `track`, ending at its last point.
pub fn mobile_node(id: NodeId, kind: Option<NodeKind>, track: &[(f64, f64)]) -> Node {
    let (x, y) = track.last().copied().unwrap_or_default();
    Node {
        id,
        x,
        y,
        kind,
        mobile: true,
        track: track.iter().map(|&(x, y)| TrackPoint { x, y }).collect(),
        ..Node::default()
    }
}

pub fn snapshot(nodes: Vec<Node>, radius_comm: f64) -> Snapshot {
    Snapshot {
        nodes,
        radius_comm,
        ..Snapshot::default()
    }
}

/// Drawing calls captured by [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear,
    Line { from: Point, to: Point, color: String, width: f64 },
    Polyline { points: Vec<Point>, color: String, width: f64, round: bool },
    Circle { center: Point, radius: f64, fill: Option<String>, stroke: Option<(String, f64)> },
    Rect { x: f64, y: f64, w: f64, h: f64, color: String },
    Text { text: String, at: Point },
    Sprite { kind: NodeKind, center: Point, size: f64 },
}

/// A [`Surface`] that records every call. Reports an 800x600 backing size.
#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<Op>,
    pub sprites_loaded: bool,
}

impl Surface for Recorder {
    fn size(&self) -> (f64, f64) {
        (800.0, 600.0)
    }

    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) {
        self.ops.push(Op::Line {
            from,
            to,
            color: stroke.color.to_string(),
            width: stroke.width,
        });
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke<'_>) {
        self.ops.push(Op::Polyline {
            points: points.to_vec(),
            color: stroke.color.to_string(),
            width: stroke.width,
            round: stroke.round,
        });
    }

    fn circle(&mut self, center: Point, radius: f64, fill: Option<&str>, stroke: Option<Stroke<'_>>) {
        self.ops.push(Op::Circle {
            center,
            radius,
            fill: fill.map(str::to_string),
            stroke: stroke.map(|s| (s.color.to_string(), s.width)),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ops.push(Op::Rect {
            x,
            y,
            w,
            h,
            color: color.to_string(),
        });
    }

    fn text(&mut self, text: &str, at: Point, _color: &str, _font: &str) {
        self.ops.push(Op::Text {
            text: text.to_string(),
            at,
        });
    }

    fn sprite_ready(&self, _kind: NodeKind) -> bool {
        self.sprites_loaded
    }

    fn sprite(&mut self, kind: NodeKind, center: Point, size: f64) {
        self.ops.push(Op::Sprite { kind, center, size });
    }
}

impl Recorder {
    pub fn with_sprites() -> Self {
        Self {
            sprites_loaded: true,
            ..Self::default()
        }
    }

    pub fn take(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}
