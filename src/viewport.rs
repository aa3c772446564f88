//! Responsive play-field sizing
//!
//! Desktop gets a fixed 500x400 field. Mobile uses the full viewport width and
//! whatever height is left after the title, score and control strips.

use serde::{Deserialize, Serialize};

/// Fixed desktop field size
pub const DESKTOP_FIELD_WIDTH: f32 = 500.0;
pub const DESKTOP_FIELD_HEIGHT: f32 = 400.0;

/// Mobile chrome reserved around the field
pub const MOBILE_TITLE_HEIGHT: f32 = 40.0;
pub const MOBILE_SCORE_HEIGHT: f32 = 40.0;
pub const MOBILE_CONTROL_HEIGHT: f32 = 60.0;
pub const MOBILE_PADDING: f32 = 24.0;
pub const MOBILE_RESERVED_HEIGHT: f32 =
    MOBILE_TITLE_HEIGHT + MOBILE_SCORE_HEIGHT + MOBILE_CONTROL_HEIGHT + MOBILE_PADDING;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

impl DeviceClass {
    /// Numeric fallback for the `(max-width: Npx)` media query
    pub fn from_viewport_width(width: f32, breakpoint_px: f32) -> Self {
        if width <= breakpoint_px {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(&self) -> bool {
        *self == DeviceClass::Mobile
    }
}

/// Raw window dimensions (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Compute the field size for a device class and viewport.
///
/// Never negative: a viewport shorter than the reserved chrome yields a
/// zero-height field, which the simulation treats as "skip this frame".
pub fn field_size(device: DeviceClass, viewport: Viewport) -> (f32, f32) {
    match device {
        DeviceClass::Desktop => (DESKTOP_FIELD_WIDTH, DESKTOP_FIELD_HEIGHT),
        DeviceClass::Mobile => (
            viewport.width.max(0.0),
            (viewport.height - MOBILE_RESERVED_HEIGHT).max(0.0),
        ),
    }
}
