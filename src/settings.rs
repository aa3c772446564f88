//! Player preferences
//!
//! Persisted in LocalStorage as JSON. Missing fields fall back to defaults so
//! older saved blobs keep loading.

use serde::{Deserialize, Serialize};

use crate::viewport::DeviceClass;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Viewports this wide or narrower count as mobile
    pub mobile_breakpoint_px: u32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Input ===
    /// Left/right halves of the field act as touch controls
    pub touch_controls: bool,

    // === Debug ===
    /// Seed every session with this value instead of the clock
    pub fixed_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 768,
            show_fps: false,
            touch_controls: true,
            fixed_seed: None,
        }
    }
}

impl Settings {
    /// CSS media query selecting the mobile layout
    pub fn mobile_media_query(&self) -> String {
        format!("(max-width: {}px)", self.mobile_breakpoint_px)
    }

    /// Device class from a window width, for when media queries are unavailable
    pub fn device_for_width(&self, width: f32) -> DeviceClass {
        DeviceClass::from_viewport_width(width, self.mobile_breakpoint_px as f32)
    }

    /// Seed for a new session: the fixed seed if set, else `clock_seed`
    pub fn session_seed(&self, clock_seed: u64) -> u64 {
        self.fixed_seed.unwrap_or(clock_seed)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "life_struggle_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring malformed settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Could not save settings: {:?}", e),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
