//! Simulation module
//!
//! All gameplay logic lives here:
//! - One `tick` per simulated frame
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies (text width comes in through
//!   the `TextMeasure` trait)

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use spawn::{TextMeasure, fit_width, maybe_spawn, spawn_obstacle};
pub use state::{Avatar, GamePhase, GameSession, Obstacle, PlayField};
pub use tick::{TickInput, TickOutcome, tick};
