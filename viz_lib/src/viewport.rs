//! World <-> screen mapping.
//!
//! The viewport is a top-left world origin plus a uniform scale in screen
//! pixels per world unit. Everything here is plain arithmetic so it can be
//! tested without a rendering surface.

use common::snapshot::{Dim, Snapshot};

/// World size assumed when neither the snapshot nor an earlier one declared
/// any dimensions.
pub const FALLBACK_WORLD_SIZE: f64 = 600.0;

/// Axis-aligned world-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Bounding box of all nodes with finite coordinates, if any.
    pub fn of_nodes(snapshot: &Snapshot) -> Option<Self> {
        snapshot
            .nodes
            .iter()
            .filter(|n| n.x.is_finite() && n.y.is_finite())
            .fold(None, |acc: Option<Bounds>, n| {
                Some(match acc {
                    None => Bounds {
                        min_x: n.x,
                        min_y: n.y,
                        max_x: n.x,
                        max_y: n.y,
                    },
                    Some(b) => Bounds {
                        min_x: b.min_x.min(n.x),
                        min_y: b.min_y.min(n.y),
                        max_x: b.max_x.max(n.x),
                        max_y: b.max_y.max(n.y),
                    },
                })
            })
    }

    /// Content bounds used for fitting: the node bounding box, or the
    /// declared world `(0,0)-(dim)` when there are no nodes.
    pub fn of_content(snapshot: &Snapshot, declared: Option<Dim>) -> Self {
        if let Some(b) = Self::of_nodes(snapshot) {
            return b;
        }
        let pick = |own: Option<f64>, prior: Option<f64>| {
            own.filter(|v| *v > 0.0)
                .or(prior.filter(|v| *v > 0.0))
                .unwrap_or(FALLBACK_WORLD_SIZE)
                .max(1.0)
        };
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: pick(snapshot.dim.map(|d| d.x), declared.map(|d| d.x)),
            max_y: pick(snapshot.dim.map(|d| d.y), declared.map(|d| d.y)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// World x at the left edge of the screen.
    pub x: f64,
    /// World y at the top edge of the screen.
    pub y: f64,
    /// Screen pixels per world unit.
    scale: f64,
    min_scale: f64,
    max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.02, 10.0)
    }
}

impl Viewport {
    /// Unit scale at the world origin. `min_scale`/`max_scale` are swapped if
    /// given in the wrong order.
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0_f64.clamp(min_scale, max_scale),
            min_scale,
            max_scale,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Set the scale directly, clamped to the configured bounds.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() {
            self.scale = self.clamp_scale(scale);
        }
    }

    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        ((wx - self.x) * self.scale, (wy - self.y) * self.scale)
    }

    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (self.x + sx / self.scale, self.y + sy / self.scale)
    }

    /// Length of a world-space distance on screen.
    pub fn world_len(&self, len: f64) -> f64 {
        len * self.scale
    }

    /// Zoom by `factor` keeping the world point under `(sx, sy)` fixed.
    /// Returns false when clamping turned the zoom into a no-op.
    pub fn zoom_at_point(&mut self, factor: f64, sx: f64, sy: f64) -> bool {
        if !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let old = self.scale;
        let new = self.clamp_scale(old * factor);
        if new / old == 1.0 {
            return false;
        }
        let (wx, wy) = self.screen_to_world(sx, sy);
        self.scale = new;
        self.x = wx - sx / new;
        self.y = wy - sy / new;
        true
    }

    /// Move the view by a screen-space drag delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.x -= dx / self.scale;
        self.y -= dy / self.scale;
    }

    /// Frame `bounds` inside a `width` x `height` pixel surface with a margin
    /// of 5% of the larger extent (at least 10 world units) on every side.
    pub fn fit_to_bounds(&mut self, bounds: Bounds, width: f64, height: f64) {
        let world_w = bounds.width().max(1.0);
        let world_h = bounds.height().max(1.0);
        let pad = (0.05 * world_w.max(world_h)).max(10.0);
        let sx = width / (world_w + pad * 2.0);
        let sy = height / (world_h + pad * 2.0);
        let fitted = sx.min(sy);
        if fitted.is_finite() && fitted > 0.0 {
            self.scale = self.clamp_scale(fitted);
        }
        self.x = bounds.min_x - pad;
        self.y = bounds.min_y - pad;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::snapshot::Node;
    use proptest::prelude::*;

    fn node(id: u64, x: f64, y: f64) -> Node {
        Node {
            id,
            x,
            y,
            ..Node::default()
        }
    }

    #[test]
    fn world_to_screen_applies_origin_and_scale() {
        let mut v = Viewport::default();
        v.x = 10.0;
        v.y = -5.0;
        v.set_scale(2.0);
        assert_eq!(v.world_to_screen(15.0, 0.0), (10.0, 10.0));
        assert_eq!(v.screen_to_world(10.0, 10.0), (15.0, 0.0));
    }

    #[test]
    fn set_scale_is_clamped() {
        let mut v = Viewport::new(0.5, 4.0);
        v.set_scale(100.0);
        assert_eq!(v.scale(), 4.0);
        v.set_scale(0.0001);
        assert_eq!(v.scale(), 0.5);
        v.set_scale(f64::NAN);
        assert_eq!(v.scale(), 0.5);
    }

    #[test]
    fn zoom_at_max_scale_is_a_noop() {
        let mut v = Viewport::new(0.02, 10.0);
        v.set_scale(10.0);
        v.x = 3.0;
        v.y = 4.0;
        let before = v;
        assert!(!v.zoom_at_point(1.1, 200.0, 150.0));
        assert_eq!(v, before);
    }

    #[test]
    fn zoom_clamps_partially() {
        let mut v = Viewport::new(0.02, 10.0);
        v.set_scale(9.0);
        assert!(v.zoom_at_point(2.0, 0.0, 0.0));
        assert_eq!(v.scale(), 10.0);
    }

    #[test]
    fn zoom_rejects_bad_factors() {
        let mut v = Viewport::default();
        assert!(!v.zoom_at_point(0.0, 1.0, 1.0));
        assert!(!v.zoom_at_point(-2.0, 1.0, 1.0));
        assert!(!v.zoom_at_point(f64::INFINITY, 1.0, 1.0));
        assert_eq!(v.scale(), 1.0);
    }

    #[test]
    fn pan_moves_origin_against_drag() {
        let mut v = Viewport::default();
        v.set_scale(2.0);
        v.pan(20.0, -10.0);
        assert_eq!((v.x, v.y), (-10.0, 5.0));
    }

    #[test]
    fn fit_single_node_keeps_margin() {
        let mut v = Viewport::default();
        let b = Bounds {
            min_x: 100.0,
            min_y: 100.0,
            max_x: 100.0,
            max_y: 100.0,
        };
        v.fit_to_bounds(b, 800.0, 600.0);
        // extent floors at 1, pad 10: 600 / 21 exceeds the max scale
        assert_eq!(v.scale(), 10.0);
        assert_eq!((v.x, v.y), (90.0, 90.0));
        let (sx, sy) = v.world_to_screen(100.0, 100.0);
        assert!(sx > 0.0 && sx < 800.0);
        assert!(sy > 0.0 && sy < 600.0);
    }

    #[test]
    fn fit_uses_tighter_axis_and_five_percent_pad() {
        let mut v = Viewport::new(0.001, 100.0);
        let b = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1000.0,
            max_y: 200.0,
        };
        v.fit_to_bounds(b, 1100.0, 1100.0);
        // pad = 50, width 1100 / 1100 = 1 vs height 1100 / 300
        assert!((v.scale() - 1.0).abs() < 1e-12);
        assert_eq!((v.x, v.y), (-50.0, -50.0));
    }

    #[test]
    fn fit_result_is_clamped() {
        let mut v = Viewport::new(0.02, 10.0);
        let b = Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        };
        v.fit_to_bounds(b, 10_000.0, 10_000.0);
        assert_eq!(v.scale(), 10.0);
    }

    #[test]
    fn content_bounds_from_nodes() {
        let s = Snapshot {
            nodes: vec![node(1, 5.0, 50.0), node(2, -3.0, 7.0), node(3, f64::NAN, 1e9)],
            ..Snapshot::default()
        };
        let b = Bounds::of_content(&s, None);
        assert_eq!(
            b,
            Bounds {
                min_x: -3.0,
                min_y: 7.0,
                max_x: 5.0,
                max_y: 50.0
            }
        );
    }

    #[test]
    fn content_bounds_fall_back_to_dimensions() {
        let mut s = Snapshot::default();
        assert_eq!(Bounds::of_content(&s, None).max_x, FALLBACK_WORLD_SIZE);

        let declared = Some(Dim { x: 300.0, y: 200.0 });
        let b = Bounds::of_content(&s, declared);
        assert_eq!((b.max_x, b.max_y), (300.0, 200.0));

        s.dim = Some(Dim { x: 800.0, y: 0.0 });
        let b = Bounds::of_content(&s, declared);
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 800.0, 200.0));
    }

    proptest! {
        #[test]
        fn screen_world_round_trip(
            ox in -1e4f64..1e4,
            oy in -1e4f64..1e4,
            scale in 0.02f64..10.0,
            wx in -1e5f64..1e5,
            wy in -1e5f64..1e5,
        ) {
            let mut v = Viewport::default();
            v.x = ox;
            v.y = oy;
            v.set_scale(scale);
            let (sx, sy) = v.world_to_screen(wx, wy);
            let (rx, ry) = v.screen_to_world(sx, sy);
            prop_assert!((rx - wx).abs() <= 1e-6 * (1.0 + wx.abs()));
            prop_assert!((ry - wy).abs() <= 1e-6 * (1.0 + wy.abs()));
        }

        #[test]
        fn zoom_keeps_cursor_anchor(
            ox in -1e3f64..1e3,
            oy in -1e3f64..1e3,
            scale in 0.1f64..5.0,
            factor in 0.5f64..1.9,
            sx in 0.0f64..1920.0,
            sy in 0.0f64..1080.0,
        ) {
            let mut v = Viewport::default();
            v.x = ox;
            v.y = oy;
            v.set_scale(scale);
            let before = v.screen_to_world(sx, sy);
            v.zoom_at_point(factor, sx, sy);
            let after = v.screen_to_world(sx, sy);
            prop_assert!((before.0 - after.0).abs() < 1e-6);
            prop_assert!((before.1 - after.1).abs() < 1e-6);
        }

        #[test]
        fn scale_stays_within_bounds(factors in prop::collection::vec(0.01f64..100.0, 1..40)) {
            let mut v = Viewport::new(0.02, 10.0);
            for f in factors {
                v.zoom_at_point(f, 400.0, 300.0);
                prop_assert!(v.scale() >= 0.02 && v.scale() <= 10.0);
            }
        }
    }
}
