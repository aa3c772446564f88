//! Surface that records draw calls instead of painting

use glam::Vec2;

use super::Surface;
use crate::sim::{Aabb, TextMeasure};

/// Average glyph width of a sans-serif font relative to its pixel size
const GLYPH_WIDTH_RATIO: f32 = 0.55;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f32,
        height: f32,
    },
    Rect {
        rect: Aabb,
        color: String,
    },
    Text {
        text: String,
        center: Vec2,
        font: String,
        max_width: Option<f32>,
    },
}

/// Records the current frame's draw calls; `clear` starts a new frame
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    calls: Vec<DrawCall>,
    frames: u64,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls since the last clear
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Number of frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

/// Pixel size out of a CSS font shorthand like "12px Arial"
fn font_px(font: &str) -> f32 {
    font.split_whitespace()
        .find_map(|part| part.strip_suffix("px")?.parse().ok())
        .unwrap_or(10.0)
}

impl TextMeasure for HeadlessSurface {
    fn measure_text(&self, text: &str, font: &str) -> f32 {
        text.chars().count() as f32 * font_px(font) * GLYPH_WIDTH_RATIO
    }
}

impl Surface for HeadlessSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.calls.clear();
        self.frames += 1;
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn fill_rect(&mut self, rect: Aabb, color: &str) {
        self.calls.push(DrawCall::Rect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, center: Vec2, font: &str, _color: &str, max_width: Option<f32>) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            center,
            font: font.to_string(),
            max_width,
        });
    }
}
