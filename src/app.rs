//! Application shell
//!
//! Screen flow: Loading -> Selection -> Playing -> GameOver -> Selection.
//! The shell owns at most one `GameLoop`; every selection or restart tears the
//! previous one down and bumps the generation so late frame callbacks from it
//! are ignored.

use crate::catalog::Catalog;
use crate::driver::{FrameOutcome, FrameScheduler, GameLoop, LoopPhase};
use crate::error::GameError;
use crate::renderer::Surface;
use crate::settings::Settings;
use crate::sim::{GameSession, PlayField};
use crate::viewport::{DeviceClass, Viewport, field_size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Waiting for the background to finish loading
    Loading,
    /// Career picker
    Selection,
    Playing,
    GameOver { score: u64 },
}

pub struct GameShell {
    catalog: Catalog,
    settings: Settings,
    screen: Screen,
    viewport: Viewport,
    device: DeviceClass,
    active: Option<GameLoop>,
    generation: u64,
}

impl GameShell {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            catalog,
            settings,
            screen: Screen::Loading,
            viewport: Viewport::default(),
            device: DeviceClass::default(),
            active: None,
            generation: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn device(&self) -> DeviceClass {
        self.device
    }

    /// The active loop, if a career has been selected
    pub fn game(&self) -> Option<&GameLoop> {
        self.active.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut GameLoop> {
        self.active.as_mut()
    }

    /// Current play-field for the stored viewport and device class
    pub fn field(&self) -> PlayField {
        let (width, height) = field_size(self.device, self.viewport);
        PlayField::new(width, height, self.device)
    }

    /// Background finished loading. One-shot; returns true the first time.
    pub fn background_ready(&mut self) -> bool {
        if self.screen != Screen::Loading {
            return false;
        }
        self.screen = Screen::Selection;
        log::info!("Background ready, showing career selection");
        true
    }

    /// Start a new session for career `id`.
    ///
    /// Replaces a session that has not started yet. Rejected once a session
    /// is running or finished; `restart` first.
    pub fn select_career(
        &mut self,
        id: &str,
        seed: u64,
        scheduler: &mut impl FrameScheduler,
    ) -> Result<(), GameError> {
        let started = self
            .active
            .as_ref()
            .is_some_and(|game| game.phase() != LoopPhase::NotStarted);
        if started || matches!(self.screen, Screen::GameOver { .. }) {
            return Err(GameError::SessionInProgress);
        }

        let career = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| GameError::UnknownCareer(id.to_string()))?;

        self.teardown(scheduler);
        self.generation += 1;

        let field = self.field();
        let mut game = GameLoop::new(GameSession::new(career, seed), self.generation);
        game.resize(field, scheduler);
        self.active = Some(game);
        self.screen = Screen::Playing;
        log::info!("Selected career '{}' (seed {}, loop {})", id, seed, self.generation);
        Ok(())
    }

    /// The drawing surface for the current session exists
    pub fn attach_surface(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        match self.active.as_mut() {
            Some(game) => game.attach_surface(scheduler),
            None => false,
        }
    }

    /// The drawing surface could not be created. The session never starts.
    pub fn surface_lost(&mut self, scheduler: &mut impl FrameScheduler) {
        log::warn!("Rendering surface unavailable, returning to selection");
        self.teardown(scheduler);
        self.screen = Screen::Selection;
    }

    /// Window resized or crossed the mobile breakpoint
    pub fn resize(
        &mut self,
        viewport: Viewport,
        device: DeviceClass,
        scheduler: &mut impl FrameScheduler,
    ) -> PlayField {
        self.viewport = viewport;
        self.device = device;
        let field = self.field();
        if let Some(game) = self.active.as_mut() {
            game.resize(field, scheduler);
        }
        field
    }

    pub fn key_down(&mut self, key: &str) -> bool {
        self.active
            .as_mut()
            .is_some_and(|game| game.input_mut().key_down(key))
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.active
            .as_mut()
            .is_some_and(|game| game.input_mut().key_up(key))
    }

    /// Touch at field-local `x`; ignored when touch controls are off
    pub fn touch(&mut self, x: f32) {
        if !self.settings.touch_controls {
            return;
        }
        let width = self.field().width;
        if let Some(game) = self.active.as_mut() {
            game.input_mut().touch(x, width);
        }
    }

    pub fn release_touch(&mut self) {
        if let Some(game) = self.active.as_mut() {
            game.input_mut().release();
        }
    }

    /// Route a frame callback. Returns the final score on the frame the
    /// session ends, `None` otherwise.
    pub fn on_frame<R: Surface>(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        generation: u64,
        time_ms: f64,
        surface: &mut R,
    ) -> Option<u64> {
        let game = self.active.as_mut()?;
        match game.frame(scheduler, generation, time_ms, surface) {
            FrameOutcome::GameOver { score } => {
                self.screen = Screen::GameOver { score };
                Some(score)
            }
            FrameOutcome::Running { .. } | FrameOutcome::Stale => None,
        }
    }

    /// Discard the session and go back to career selection
    pub fn restart(&mut self, scheduler: &mut impl FrameScheduler) {
        self.teardown(scheduler);
        if self.screen != Screen::Loading {
            self.screen = Screen::Selection;
        }
        log::info!("Restart, back to selection");
    }

    /// Flip the FPS counter and persist the preference. Returns the new state.
    pub fn toggle_fps(&mut self) -> bool {
        self.settings.show_fps = !self.settings.show_fps;
        self.settings.save();
        log::info!("FPS counter {}", if self.settings.show_fps { "on" } else { "off" });
        self.settings.show_fps
    }

    pub fn fps(&self) -> u32 {
        self.active.as_ref().map_or(0, |game| game.fps())
    }

    fn teardown(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(mut game) = self.active.take() {
            game.teardown(scheduler);
        }
    }
}
