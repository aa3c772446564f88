//! Game state and core simulation types
//!
//! A `GameSession` is one playthrough: created when a career is selected,
//! discarded on restart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::catalog::Career;
use crate::consts::*;
use crate::viewport::DeviceClass;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Avatar was hit; terminal
    GameOver,
}

/// The rectangle everything is simulated and drawn in
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
    pub device: DeviceClass,
}

impl PlayField {
    pub fn new(width: f32, height: f32, device: DeviceClass) -> Self {
        Self {
            width,
            height,
            device,
        }
    }

    /// A zero-size field cannot host a simulation step
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Widest an obstacle may get on this field
    pub fn max_obstacle_width(&self) -> f32 {
        OBSTACLE_MAX_WIDTH.min(self.width * OBSTACLE_MAX_WIDTH_FRACTION)
    }
}

/// The player's avatar, pinned to the bottom edge
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Avatar {
    /// Left edge
    pub x: f32,
}

impl Avatar {
    /// Rightmost legal x for a field
    pub fn max_x(field: &PlayField) -> f32 {
        (field.width - AVATAR_SIZE).max(0.0)
    }

    pub fn clamp_to(&mut self, field: &PlayField) {
        self.x = self.x.min(Self::max_x(field)).max(0.0);
    }

    pub fn center_in(&mut self, field: &PlayField) {
        self.x = field.width / 2.0 - AVATAR_SIZE / 2.0;
        self.clamp_to(field);
    }

    pub fn bounds(&self, field: &PlayField) -> Aabb {
        Aabb::new(
            Vec2::new(self.x, field.height - AVATAR_SIZE),
            Vec2::splat(AVATAR_SIZE),
        )
    }
}

/// A falling, labeled hazard
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub text: String,
    /// Pixels per frame, fixed at spawn
    pub speed: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Box at the position the next step will move it to
    pub fn next_bounds(&self) -> Aabb {
        Aabb::new(self.pos + Vec2::new(0.0, self.speed), self.size)
    }

    /// Where the renderer paints it: one step behind the simulated position
    pub fn draw_pos(&self) -> Vec2 {
        self.pos - Vec2::new(0.0, self.speed)
    }
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Run seed
    pub seed: u64,
    pub career: Career,
    pub field: PlayField,
    pub avatar: Avatar,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Simulated frames survived
    pub score: u64,
    /// Falling speed handed to new obstacles
    pub speed: f32,
    pub phase: GamePhase,
    /// Timestamp (ms) of the last spawn
    pub last_spawn_ms: f64,
    pub(crate) rng: Pcg32,
    /// Set once the field has had a non-empty size
    sized: bool,
}

impl GameSession {
    /// Create a new session for a career with the given seed
    pub fn new(career: Career, seed: u64) -> Self {
        Self {
            seed,
            career,
            field: PlayField::default(),
            avatar: Avatar::default(),
            obstacles: Vec::new(),
            score: 0,
            speed: INITIAL_SPEED,
            phase: GamePhase::Playing,
            last_spawn_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            sized: false,
        }
    }

    /// Create a session with an already-sized field
    pub fn with_field(career: Career, seed: u64, field: PlayField) -> Self {
        let mut session = Self::new(career, seed);
        session.resize(field);
        session
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Apply a new field size.
    ///
    /// The avatar is centered on the first non-empty sizing only; later
    /// resizes just keep it inside the field. Obstacles keep their x/width.
    pub fn resize(&mut self, field: PlayField) {
        self.field = field;
        if !self.sized && !field.is_empty() {
            self.avatar.center_in(&field);
            self.sized = true;
        } else {
            self.avatar.clamp_to(&field);
        }
    }

    /// Restart the spawn interval from `now_ms`
    pub fn reset_spawn_clock(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
    }
}
