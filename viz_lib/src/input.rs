//! Pointer and keyboard input, already converted to canvas backing pixels.

use crate::render::Point;

/// Button number of the primary (left) mouse button.
pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Wheel notch over the canvas; negative `delta_y` zooms in.
    Wheel { delta_y: f64, sx: f64, sy: f64 },
    PointerDown { button: i16, sx: f64, sy: f64 },
    /// Pointer moved anywhere in the window.
    PointerMove { sx: f64, sy: f64 },
    /// Pointer released anywhere in the window.
    PointerUp,
    Click { sx: f64, sy: f64 },
    Key(String),
}

/// What the controller has to do after handling an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reaction {
    pub redraw: bool,
    pub selection_changed: bool,
}

impl Reaction {
    pub const NONE: Reaction = Reaction {
        redraw: false,
        selection_changed: false,
    };

    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::NONE
        }
    }

    pub fn selection() -> Self {
        Self {
            redraw: true,
            selection_changed: true,
        }
    }
}

/// Zoom factor for a wheel event, or `None` for a purely horizontal scroll.
pub fn wheel_factor(delta_y: f64, step: f64) -> Option<f64> {
    if delta_y < 0.0 {
        Some(step)
    } else if delta_y > 0.0 {
        Some(1.0 / step)
    } else {
        None
    }
}

/// Map a position in CSS pixels relative to the canvas box onto its backing
/// store, which is `dpr` times larger.
pub fn to_backing_px(css_x: f64, css_y: f64, dpr: f64) -> Point {
    let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    (css_x * dpr, css_y * dpr)
}

/// Primary-button drag in progress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    last: Option<Point>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.last.is_some()
    }

    pub fn begin(&mut self, at: Point) {
        self.last = Some(at);
    }

    /// Screen delta since the previous position, when dragging.
    pub fn move_to(&mut self, at: Point) -> Option<(f64, f64)> {
        let last = self.last.as_mut()?;
        let delta = (at.0 - last.0, at.1 - last.1);
        *last = at;
        Some(delta)
    }

    pub fn end(&mut self) {
        self.last = None;
    }
}
