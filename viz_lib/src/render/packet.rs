//! Packet propagation overlay.

use super::{css_with_alpha, palette, Frame, Stroke, Surface};
use common::snapshot::Packet;

/// Side of the square marker in pixels.
pub const SQUARE_SIZE: f64 = 6.0;
/// The trailing ring sits this fraction of the full radius behind the front.
const SECONDARY_LAG: f64 = 0.25;
/// Secondary rings smaller than this are not drawn.
const SECONDARY_MIN_PX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub radius: f64,
    pub alpha: f64,
    pub width: f64,
}

/// Screen-space rings for a wave at `phase`: the leading front and, once it
/// has expanded far enough, a fainter one behind it.
pub fn wave_rings(phase: f64, radius_comm: f64, scale: f64) -> (Ring, Option<Ring>) {
    let phase = if phase.is_nan() { 0.0 } else { phase.clamp(0.0, 1.0) };
    let full = radius_comm.max(0.0) * scale;
    let front = Ring {
        radius: phase * full,
        alpha: 0.1 + 0.9 * (1.0 - phase),
        width: (2.0 * (1.0 - phase)).max(1.0),
    };
    let lag = front.radius - SECONDARY_LAG * full;
    let trailing = (lag > SECONDARY_MIN_PX).then_some(Ring {
        radius: lag,
        alpha: front.alpha * 0.5,
        ..front
    });
    (front, trailing)
}

/// Linear interpolation between two screen points.
pub fn lerp(from: (f64, f64), to: (f64, f64), t: f64) -> (f64, f64) {
    (
        from.0 * (1.0 - t) + to.0 * t,
        from.1 * (1.0 - t) + to.1 * t,
    )
}

pub(crate) fn draw_wave(surface: &mut dyn Surface, frame: &Frame<'_>, p: &Packet) {
    let Some(src) = frame.snapshot.node(p.source) else {
        return;
    };
    let center = frame.screen(src);
    let (front, trailing) = wave_rings(
        p.clamped_phase(),
        frame.snapshot.radius_comm,
        frame.viewport.scale(),
    );
    for ring in std::iter::once(front).chain(trailing) {
        let color = css_with_alpha(palette::PACKET, ring.alpha);
        surface.circle(center, ring.radius, None, Some(Stroke::new(&color, ring.width)));
    }
}

pub(crate) fn draw_squares(surface: &mut dyn Surface, frame: &Frame<'_>, p: &Packet) {
    let Some(src) = frame.snapshot.node(p.source) else {
        return;
    };
    let phase = p.clamped_phase();
    let from = frame.screen(src);
    for dest in p.dests.iter().filter_map(|id| frame.snapshot.node(*id)) {
        let (x, y) = lerp(from, frame.screen(dest), phase);
        let half = SQUARE_SIZE / 2.0;
        surface.fill_rect(
            (x - half).round(),
            (y - half).round(),
            SQUARE_SIZE,
            SQUARE_SIZE,
            palette::PACKET_SQUARE,
        );
    }
}
