//! [`Surface`] on a browser 2D canvas context.

use glam::DVec2;
use particle_field_core::{Srgb, Surface};
use std::f64::consts::TAU;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draws through `CanvasRenderingContext2d` with `rgba(...)` styles.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Wraps the canvas's 2D context, or `None` when the browser refuses one.
    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    #[allow(deprecated)]
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Srgb, alpha: f64) {
        self.ctx.begin_path();
        // Only fails for a negative radius, which the config rejects.
        let _ = self.ctx.arc(center.x, center.y, radius, 0.0, TAU);
        self.ctx.set_fill_style(&JsValue::from_str(&color.css_rgba(alpha)));
        self.ctx.fill();
    }

    #[allow(deprecated)]
    fn stroke_line(&mut self, from: DVec2, to: DVec2, width: f64, color: Srgb, alpha: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style(&JsValue::from_str(&color.css_rgba(alpha)));
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}
