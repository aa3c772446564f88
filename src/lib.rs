//! Life Is A Struggle - a falling-obstacle dodge game
//!
//! Core modules:
//! - `sim`: Simulation (avatar, obstacles, spawning, collisions, session state)
//! - `driver`: Frame-driven game loop with cancellable scheduling
//! - `renderer`: Immediate-mode drawing surfaces (Canvas 2D, headless)
//! - `viewport`: Responsive play-field sizing
//! - `input`: Keyboard and touch-zone movement intent
//! - `catalog`: Career themes and their obstacle vocabularies
//! - `app`: Selection / playing / game-over shell

pub mod app;
pub mod catalog;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod driver;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod viewport;

pub use app::{GameShell, Screen};
pub use catalog::{Career, Catalog};
pub use error::GameError;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (one display frame at 60 Hz)
    pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest wall-clock gap fed to the accumulator (ms)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;
    /// A step fires when the accumulator is within this much of a full step,
    /// so timestamp rounding on 60 Hz displays still yields one step per frame
    pub const STEP_SLACK_MS: f64 = 0.5;

    /// Avatar is a square pinned to the bottom of the field
    pub const AVATAR_SIZE: f32 = 50.0;
    /// Horizontal avatar movement per simulated frame
    pub const AVATAR_STEP: f32 = 5.0;

    /// Obstacle geometry
    pub const OBSTACLE_HEIGHT: f32 = 30.0;
    pub const OBSTACLE_MIN_WIDTH: f32 = 80.0;
    pub const OBSTACLE_MAX_WIDTH: f32 = 400.0;
    /// Horizontal padding on each side of the label
    pub const OBSTACLE_PADDING: f32 = 20.0;
    /// Obstacles never exceed this fraction of the field width
    pub const OBSTACLE_MAX_WIDTH_FRACTION: f32 = 0.8;
    /// Minimum time between spawns (ms)
    pub const OBSTACLE_FREQUENCY_MS: f64 = 1500.0;

    /// Falling speed of the first obstacles (px per frame)
    pub const INITIAL_SPEED: f32 = 2.0;
    /// Global speed ramp per simulated frame
    pub const SPEED_INCREMENT: f32 = 0.0001;

    /// Fonts
    pub const OBSTACLE_FONT: &str = "12px Arial";
    pub const AVATAR_FONT: &str = "30px Arial";

    /// Colors
    pub const OBSTACLE_COLOR: &str = "#FF4444";
    pub const TEXT_COLOR: &str = "#FFFFFF";
}
