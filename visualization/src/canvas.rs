//! 2D canvas implementation of the renderer's drawing surface.

use common::snapshot::NodeKind;
use std::f64::consts::TAU;
use viz_lib::export;
use viz_lib::render::{Point, Stroke, Surface};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

const SPRITE_DIR: &str = "/static/simulation/img";

fn sprite_url(kind: NodeKind) -> String {
    let name = match kind {
        NodeKind::Regular => "regular",
        NodeKind::Uav => "uav",
        NodeKind::Intruder => "intruder",
    };
    format!("{SPRITE_DIR}/node-{name}.png")
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// Node sprites, one per kind, loading in the background.
pub struct Sprites {
    regular: HtmlImageElement,
    uav: HtmlImageElement,
    intruder: HtmlImageElement,
}

impl Sprites {
    pub fn load() -> Result<Self, JsValue> {
        let image = |kind| -> Result<HtmlImageElement, JsValue> {
            let img = HtmlImageElement::new()?;
            img.set_src(&sprite_url(kind));
            Ok(img)
        };
        Ok(Self {
            regular: image(NodeKind::Regular)?,
            uav: image(NodeKind::Uav)?,
            intruder: image(NodeKind::Intruder)?,
        })
    }

    pub fn get(&self, kind: NodeKind) -> &HtmlImageElement {
        match kind {
            NodeKind::Regular => &self.regular,
            NodeKind::Uav => &self.uav,
            NodeKind::Intruder => &self.intruder,
        }
    }

    pub fn all(&self) -> [&HtmlImageElement; 3] {
        [&self.regular, &self.uav, &self.intruder]
    }
}

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sprites: Sprites,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, sprites: Sprites) -> Result<Self, JsValue> {
        let ctx = context_2d(&canvas)?;
        Ok(Self {
            canvas,
            ctx,
            sprites,
        })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn sprites(&self) -> &Sprites {
        &self.sprites
    }

    /// Resize the backing store to the displayed size times the device pixel
    /// ratio; returns the backing size.
    pub fn sync_size(&self) -> (f64, f64) {
        let dpr = device_pixel_ratio();
        let rect = self.canvas.get_bounding_client_rect();
        let width = (rect.width() * dpr).round().max(0.0) as u32;
        let height = (rect.height() * dpr).round().max(0.0) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        (f64::from(width), f64::from(height))
    }

    /// Pointer position from client coordinates to backing pixels.
    pub fn backing_point(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        viz_lib::input::to_backing_px(
            f64::from(client_x) - rect.left(),
            f64::from(client_y) - rect.top(),
            device_pixel_ratio(),
        )
    }

    fn apply_stroke(&self, stroke: Stroke<'_>) {
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.set_line_width(stroke.width);
        let (cap, join) = if stroke.round {
            ("round", "round")
        } else {
            ("butt", "miter")
        };
        self.ctx.set_line_cap(cap);
        self.ctx.set_line_join(join);
    }

    /// Download the current frame as a PNG on an opaque white background.
    pub fn export_png(&self, file_name: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let copy: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        copy.set_width(self.canvas.width());
        copy.set_height(self.canvas.height());
        let ctx = context_2d(&copy)?;
        ctx.set_fill_style_str(export::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, f64::from(copy.width()), f64::from(copy.height()));
        ctx.draw_image_with_html_canvas_element(&self.canvas, 0.0, 0.0)?;
        let url = copy.to_data_url_with_type("image/png")?;

        let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        link.set_href(&url);
        link.set_download(file_name);
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&link)?;
        link.click();
        link.remove();
        Ok(())
    }
}

pub fn device_pixel_ratio() -> f64 {
    web_sys::window().map_or(1.0, |w| w.device_pixel_ratio())
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke<'_>) {
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke<'_>) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.apply_stroke(stroke);
        self.ctx.begin_path();
        self.ctx.move_to(first.0, first.1);
        for p in rest {
            self.ctx.line_to(p.0, p.1);
        }
        self.ctx.stroke();
    }

    fn circle(&mut self, center: Point, radius: f64, fill: Option<&str>, stroke: Option<Stroke<'_>>) {
        self.ctx.begin_path();
        if let Err(e) = self.ctx.arc(center.0, center.1, radius.max(0.0), 0.0, TAU) {
            tracing::debug!(?e, radius, "arc rejected");
            return;
        }
        if let Some(color) = fill {
            self.ctx.set_fill_style_str(color);
            self.ctx.fill();
        }
        if let Some(stroke) = stroke {
            self.apply_stroke(stroke);
            self.ctx.stroke();
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(x, y, w, h);
    }

    fn text(&mut self, text: &str, at: Point, color: &str, font: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, at.0, at.1);
    }

    fn sprite_ready(&self, kind: NodeKind) -> bool {
        let img = self.sprites.get(kind);
        img.complete() && img.natural_width() > 0
    }

    fn sprite(&mut self, kind: NodeKind, center: Point, size: f64) {
        let img = self.sprites.get(kind);
        let half = size / 2.0;
        let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            img,
            center.0 - half,
            center.1 - half,
            size,
            size,
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn surface(width: u32, height: u32) -> CanvasSurface {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();
        canvas.set_width(width);
        canvas.set_height(height);
        CanvasSurface::new(canvas, Sprites::load().unwrap()).unwrap()
    }

    #[wasm_bindgen_test]
    fn size_follows_backing_store() {
        let s = surface(320, 200);
        assert_eq!(s.size(), (320.0, 200.0));
    }

    #[wasm_bindgen_test]
    fn sprites_point_at_static_images() {
        assert_eq!(sprite_url(NodeKind::Uav), "/static/simulation/img/node-uav.png");
        let s = surface(10, 10);
        assert!(s.sprites().get(NodeKind::Intruder).src().ends_with("node-intruder.png"));
    }

    #[wasm_bindgen_test]
    fn drawing_negative_radius_does_not_throw() {
        let mut s = surface(50, 50);
        s.circle((10.0, 10.0), -4.0, Some("#000"), None);
        s.polyline(&[], Stroke::new("#000", 1.0));
        s.clear();
    }
}
