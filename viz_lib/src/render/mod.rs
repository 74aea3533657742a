//! Full-frame renderer.
//!
//! Every call clears the surface and draws, back to front: connectivity
//! edges, trails, selection highlight, nodes, packet overlay. The drawing
//! target is abstracted by [`Surface`] so the logic runs without a canvas.

pub mod packet;
pub mod palette;
pub mod trails;

use crate::preferences::{PacketStyle, Preferences};
use crate::topology::{connectivity_edges, neighbors};
use crate::viewport::Viewport;
use common::snapshot::{Node, NodeKind, Snapshot};
use palette::Rgba;

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke<'a> {
    pub color: &'a str,
    pub width: f64,
    /// Round caps and joins.
    pub round: bool,
}

impl<'a> Stroke<'a> {
    pub fn new(color: &'a str, width: f64) -> Self {
        Self {
            color,
            width,
            round: false,
        }
    }

    pub fn rounded(self) -> Self {
        Self {
            round: true,
            ..self
        }
    }
}

/// Drawing primitives in screen pixels.
pub trait Surface {
    /// Backing size in pixels.
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>);
    fn polyline(&mut self, points: &[Point], stroke: Stroke<'_>);
    fn circle(&mut self, center: Point, radius: f64, fill: Option<&str>, stroke: Option<Stroke<'_>>);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn text(&mut self, text: &str, at: Point, color: &str, font: &str);
    /// Whether the sprite for `kind` is loaded and can be drawn.
    fn sprite_ready(&self, kind: NodeKind) -> bool;
    /// Draw the `kind` sprite as a `size` x `size` square centred on `center`.
    fn sprite(&mut self, kind: NodeKind, center: Point, size: f64);
}

/// Everything one redraw depends on.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub snapshot: &'a Snapshot,
    pub viewport: &'a Viewport,
    pub prefs: &'a Preferences,
    /// Already resolved against `snapshot`.
    pub selected: Option<&'a Node>,
}

impl Frame<'_> {
    fn screen(&self, node: &Node) -> Point {
        self.viewport.world_to_screen(node.x, node.y)
    }
}

pub fn render(surface: &mut dyn Surface, frame: &Frame<'_>) {
    surface.clear();
    if frame.prefs.show_graph {
        draw_connectivity(surface, frame);
    }
    if frame.prefs.show_trails {
        trails::draw_trails(surface, frame);
    }
    if let Some(node) = frame.selected {
        draw_selection(surface, frame, node);
    }
    draw_nodes(surface, frame);
    if let Some(p) = &frame.snapshot.packet {
        match frame.prefs.packet_style {
            PacketStyle::Wave => packet::draw_wave(surface, frame, p),
            PacketStyle::Packet => packet::draw_squares(surface, frame, p),
        }
    }
}

fn draw_connectivity(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let color = palette::EDGE.css();
    for (a, b) in connectivity_edges(frame.snapshot, frame.snapshot.radius_comm) {
        surface.line(frame.screen(a), frame.screen(b), Stroke::new(&color, 1.0));
    }
}

/// Radius of the outline ring drawn around the selected node.
pub fn selection_outline_radius(prefs: &Preferences) -> f64 {
    if prefs.show_sprites {
        prefs.node_size.max(10.0)
    } else {
        prefs.node_size + 3.0
    }
}

fn draw_selection(surface: &mut dyn Surface, frame: &Frame<'_>, node: &Node) {
    let radius = frame.snapshot.radius_comm;
    let center = frame.screen(node);
    let range_px = frame.viewport.world_len(radius).max(1.0);

    let fill = palette::RANGE_FILL.css();
    let ring = palette::RANGE_STROKE.css();
    surface.circle(center, range_px, Some(&fill), Some(Stroke::new(&ring, 2.0)));

    let edge = palette::NEIGHBOR_EDGE.css();
    for m in neighbors(frame.snapshot, node, radius) {
        surface.line(center, frame.screen(m), Stroke::new(&edge, 2.0));
    }

    let outline = palette::SELECTION_OUTLINE.css();
    surface.circle(
        center,
        selection_outline_radius(frame.prefs),
        None,
        Some(Stroke::new(&outline, 3.0)),
    );
}

fn draw_nodes(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let r = frame.prefs.node_size;
    for node in &frame.snapshot.nodes {
        let (x, y) = frame.screen(node);
        let kind = node.kind();
        if frame.prefs.show_sprites && surface.sprite_ready(kind) {
            let size = r * 2.0;
            if matches!(kind, NodeKind::Uav | NodeKind::Intruder) {
                surface.sprite(kind, (x, y), size * 2.0);
            }
            surface.sprite(kind, (x, y), size);
        } else {
            surface.circle(
                (x, y),
                r,
                Some(node.fill_color()),
                Some(Stroke::new(palette::NODE_OUTLINE, 1.0)),
            );
        }
        if frame.prefs.show_ids {
            surface.text(
                &node.id.to_string(),
                (x + r + 1.0, y - (r + 1.0)),
                palette::LABEL,
                palette::LABEL_FONT,
            );
        }
    }
}

/// Colour helper shared by the overlay modules.
pub(crate) fn css_with_alpha(color: Rgba, alpha: f64) -> String {
    color.with_alpha(alpha).css()
}
