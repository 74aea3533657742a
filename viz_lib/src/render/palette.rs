//! Colours used by the renderer.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

pub const EDGE: Rgba = Rgba::new(40, 40, 40, 0.8);
pub const PACKET: Rgba = Rgba::new(13, 110, 253, 1.0);
pub const RANGE_FILL: Rgba = Rgba::new(220, 53, 69, 0.08);
pub const RANGE_STROKE: Rgba = Rgba::new(220, 53, 69, 0.9);
pub const NEIGHBOR_EDGE: Rgba = Rgba::new(25, 135, 84, 0.9);
pub const SELECTION_OUTLINE: Rgba = Rgba::new(255, 193, 7, 0.9);
pub const TRAIL_INTRUDER: Rgba = Rgba::new(255, 10, 10, 1.0);
pub const TRAIL_OTHER: Rgba = Rgba::new(13, 110, 253, 1.0);

pub const NODE_OUTLINE: &str = "#000";
pub const LABEL: &str = "#00A000";
pub const LABEL_FONT: &str = "12px sans-serif";
pub const PACKET_SQUARE: &str = "#0d6efd";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_formatting() {
        assert_eq!(EDGE.css(), "rgba(40,40,40,0.8)");
        assert_eq!(PACKET.with_alpha(0.5).css(), "rgba(13,110,253,0.5)");
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(TRAIL_OTHER.with_alpha(3.0).a, 1.0);
        assert_eq!(TRAIL_OTHER.with_alpha(-1.0).a, 0.0);
    }
}
