//! Canvas 2D surface (browser only)

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Surface;
use crate::error::GameError;
use crate::sim::{Aabb, TextMeasure};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Grab the 2D context of a canvas
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, GameError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(GameError::SurfaceUnavailable)?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the field size
    pub fn set_size(&self, width: f32, height: f32) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl TextMeasure for CanvasSurface {
    fn measure_text(&self, text: &str, font: &str) -> f32 {
        self.ctx.save();
        self.ctx.set_font(font);
        let width = match self.ctx.measure_text(text) {
            Ok(metrics) => metrics.width() as f32,
            Err(e) => {
                log::warn!("measureText failed: {:?}", e);
                0.0
            }
        };
        self.ctx.restore();
        width
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_rect(&mut self, rect: Aabb, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            rect.min.x as f64,
            rect.min.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn fill_text(&mut self, text: &str, center: Vec2, font: &str, color: &str, max_width: Option<f32>) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        let (x, y) = (center.x as f64, center.y as f64);
        let result = match max_width {
            Some(max) => self.ctx.fill_text_with_max_width(text, x, y, max.max(0.0) as f64),
            None => self.ctx.fill_text(text, x, y),
        };
        if let Err(e) = result {
            log::warn!("fillText failed: {:?}", e);
        }
    }
}
