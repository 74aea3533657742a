//! Movement trails for mobile nodes.

use super::{css_with_alpha, palette, Frame, Point, Stroke, Surface};
use common::snapshot::{Node, NodeKind};

/// Fade never goes below this alpha, so the oldest segment stays visible.
const MIN_SEGMENT_ALPHA: f64 = 0.05;

/// Keep the first point, then every point at least `min_step` away from the
/// last kept one.
pub fn downsample(points: impl IntoIterator<Item = Point>, min_step: f64) -> Vec<Point> {
    let mut kept: Vec<Point> = Vec::new();
    for p in points {
        let far_enough = kept
            .last()
            .map_or(true, |last| (p.0 - last.0).hypot(p.1 - last.1) >= min_step);
        if far_enough {
            kept.push(p);
        }
    }
    kept
}

/// Alpha of each of the `points - 1` segments, oldest first, rising to
/// `base` at the newest.
pub fn segment_alphas(points: usize, base: f64) -> Vec<f64> {
    if points < 2 {
        return Vec::new();
    }
    let last = (points - 1) as f64;
    (1..points)
        .map(|i| (base * i as f64 / last).max(MIN_SEGMENT_ALPHA))
        .collect()
}

fn trail_color(node: &Node) -> palette::Rgba {
    match node.kind {
        None | Some(NodeKind::Intruder) => palette::TRAIL_INTRUDER,
        Some(_) => palette::TRAIL_OTHER,
    }
}

pub(crate) fn draw_trails(surface: &mut dyn Surface, frame: &Frame<'_>) {
    let prefs = frame.prefs;
    for node in frame.snapshot.nodes.iter().filter(|n| n.mobile && n.track.len() >= 2) {
        let points = downsample(
            node.track
                .iter()
                .map(|p| frame.viewport.world_to_screen(p.x, p.y)),
            prefs.trail_min_screen_step,
        );
        if points.len() < 2 {
            continue;
        }
        let color = trail_color(node);
        if prefs.trail_fade {
            let alphas = segment_alphas(points.len(), prefs.trail_alpha);
            for (segment, alpha) in points.windows(2).zip(alphas) {
                let css = css_with_alpha(color, alpha);
                surface.line(segment[0], segment[1], Stroke::new(&css, prefs.trail_width).rounded());
            }
        } else {
            let css = css_with_alpha(color, prefs.trail_alpha);
            surface.polyline(&points, Stroke::new(&css, prefs.trail_width).rounded());
        }
    }
}
