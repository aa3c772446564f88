//! Game loop driver
//!
//! Owns a session and its frame schedule: NotStarted -> Running -> Stopped.
//! The loop starts once it has both a drawing surface and a non-empty field,
//! keeps at most one frame request outstanding, and ignores callbacks that
//! belong to another loop generation or arrive after it stopped.
//!
//! Simulation runs at a fixed 60 Hz step with an accumulator, so the per-frame
//! constants (avatar step, speed ramp) mean the same thing on any display.

use crate::consts::*;
use crate::input::InputTracker;
use crate::renderer::{Surface, draw_frame};
use crate::sim::{GameSession, PlayField, TickOutcome, tick};

/// Handle returned by a scheduler (requestAnimationFrame id in the browser)
pub type FrameId = i32;

/// Source of display-refresh callbacks
pub trait FrameScheduler {
    /// Request one callback tagged with `generation`
    fn request_frame(&mut self, generation: u64) -> Option<FrameId>;

    /// Cancel a request that has not fired yet
    fn cancel_frame(&mut self, id: FrameId);
}

/// Scheduler driven by hand: native demo and tests pump `take_due`
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: FrameId,
    pending: Vec<(FrameId, u64)>,
    cancelled: Vec<FrameId>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outstanding requests as (id, generation)
    pub fn pending(&self) -> &[(FrameId, u64)] {
        &self.pending
    }

    pub fn cancelled(&self) -> &[FrameId] {
        &self.cancelled
    }

    /// Hand over every outstanding request, oldest first
    pub fn take_due(&mut self) -> Vec<(FrameId, u64)> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, generation: u64) -> Option<FrameId> {
        self.next_id += 1;
        self.pending.push((self.next_id, generation));
        Some(self.next_id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.pending.retain(|(pending, _)| *pending != id);
        self.cancelled.push(id);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    NotStarted,
    Running,
    /// Terminal: collision or teardown
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Callback for another generation, or the loop is not running
    Stale,
    /// Frame simulated and drawn, next frame requested
    Running { steps: u32 },
    /// Session ended this frame; no further frames will be requested
    GameOver { score: u64 },
}

/// Wall clock to fixed-step conversion plus FPS tracking
#[derive(Debug, Clone)]
struct FrameClock {
    /// Unsimulated wall time (ms); may dip slightly below zero by the slack
    accumulator_ms: f64,
    last_time: Option<f64>,
    /// Simulated milliseconds since the loop started
    sim_time_ms: f64,
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl FrameClock {
    fn new() -> Self {
        Self {
            accumulator_ms: 0.0,
            last_time: None,
            sim_time_ms: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Feed a display timestamp, get the number of simulation steps due
    fn advance(&mut self, time_ms: f64) -> u32 {
        let dt_ms = match self.last_time {
            Some(last) => time_ms - last,
            None => SIM_DT_MS,
        };
        self.last_time = Some(time_ms);
        self.accumulator_ms += dt_ms.clamp(0.0, MAX_FRAME_DT_MS);

        // FPS from the oldest of the last 60 frames
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 && time_ms > oldest {
            self.fps = (60_000.0 / (time_ms - oldest)).round() as u32;
        }

        let mut steps = 0;
        while self.accumulator_ms + STEP_SLACK_MS >= SIM_DT_MS && steps < MAX_SUBSTEPS {
            self.accumulator_ms -= SIM_DT_MS;
            steps += 1;
        }
        steps
    }

    /// Advance simulated time by one step and return it
    fn step(&mut self) -> f64 {
        self.sim_time_ms += SIM_DT_MS;
        self.sim_time_ms
    }
}

/// One session plus the machinery that runs it
#[derive(Debug)]
pub struct GameLoop {
    session: GameSession,
    input: InputTracker,
    phase: LoopPhase,
    generation: u64,
    pending: Option<FrameId>,
    surface_ready: bool,
    clock: FrameClock,
}

impl GameLoop {
    pub fn new(session: GameSession, generation: u64) -> Self {
        Self {
            session,
            input: InputTracker::new(),
            phase: LoopPhase::NotStarted,
            generation,
            pending: None,
            surface_ready: false,
            clock: FrameClock::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn input_mut(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Id of the outstanding frame request, if any
    pub fn pending_frame(&self) -> Option<FrameId> {
        self.pending
    }

    pub fn fps(&self) -> u32 {
        self.clock.fps
    }

    /// The drawing surface exists; start if the field is sized too
    pub fn attach_surface(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        self.surface_ready = true;
        self.try_start(scheduler)
    }

    /// New field size; start if the surface is attached too
    pub fn resize(&mut self, field: PlayField, scheduler: &mut impl FrameScheduler) -> bool {
        self.session.resize(field);
        self.try_start(scheduler)
    }

    fn try_start(&mut self, scheduler: &mut impl FrameScheduler) -> bool {
        if self.phase != LoopPhase::NotStarted
            || !self.surface_ready
            || self.session.field.is_empty()
        {
            return false;
        }

        self.phase = LoopPhase::Running;
        self.clock = FrameClock::new();
        self.session.reset_spawn_clock(0.0);
        self.schedule(scheduler);
        log::info!(
            "Loop {} started ({}x{} field, career '{}')",
            self.generation,
            self.session.field.width,
            self.session.field.height,
            self.session.career.id
        );
        true
    }

    fn schedule(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.pending.is_some() {
            return;
        }
        self.pending = scheduler.request_frame(self.generation);
        if self.pending.is_none() {
            log::error!("Could not schedule frame for loop {}", self.generation);
        }
    }

    /// Handle a display-refresh callback
    pub fn frame<R: Surface>(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        generation: u64,
        time_ms: f64,
        surface: &mut R,
    ) -> FrameOutcome {
        if generation != self.generation || self.phase != LoopPhase::Running {
            log::debug!(
                "Ignoring stale frame (generation {} vs {}, {:?})",
                generation,
                self.generation,
                self.phase
            );
            return FrameOutcome::Stale;
        }
        self.pending = None;

        let steps = self.clock.advance(time_ms);
        let input = self.input.snapshot();
        for _ in 0..steps {
            let now = self.clock.step();
            if let TickOutcome::GameOver { score } = tick(&mut self.session, &input, now, &*surface) {
                self.phase = LoopPhase::Stopped;
                draw_frame(surface, &self.session);
                return FrameOutcome::GameOver { score };
            }
        }

        draw_frame(surface, &self.session);
        self.schedule(scheduler);
        FrameOutcome::Running { steps }
    }

    /// Stop for good and cancel any outstanding request
    pub fn teardown(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
        if self.phase != LoopPhase::Stopped {
            log::info!("Loop {} torn down", self.generation);
        }
        self.phase = LoopPhase::Stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Career;
    use crate::renderer::HeadlessSurface;
    use crate::sim::Obstacle;
    use crate::viewport::DeviceClass;
    use glam::Vec2;

    fn new_loop(generation: u64) -> GameLoop {
        let career = Career {
            id: "corporate".into(),
            name: "Corporate Employee".into(),
            avatar: "C".into(),
            obstacles: vec!["Pointless Meeting".into()],
        };
        GameLoop::new(GameSession::new(career, 11), generation)
    }

    fn desktop() -> PlayField {
        PlayField::new(500.0, 400.0, DeviceClass::Desktop)
    }

    /// Fire every due frame `frames` times, 20ms apart
    fn pump(
        game: &mut GameLoop,
        sched: &mut ManualScheduler,
        surface: &mut HeadlessSurface,
        frames: usize,
    ) -> Vec<FrameOutcome> {
        let mut outcomes = Vec::new();
        let mut time = 1000.0;
        for _ in 0..frames {
            for (_, generation) in sched.take_due() {
                outcomes.push(game.frame(sched, generation, time, surface));
            }
            time += 20.0;
        }
        outcomes
    }

    #[test]
    fn test_waits_for_surface_and_size() {
        let mut sched = ManualScheduler::new();
        let mut game = new_loop(1);

        assert!(!game.attach_surface(&mut sched));
        assert_eq!(game.phase(), LoopPhase::NotStarted);

        // Zero-size resize keeps waiting
        assert!(!game.resize(PlayField::new(0.0, 0.0, DeviceClass::Mobile), &mut sched));
        assert!(sched.pending().is_empty());

        assert!(game.resize(desktop(), &mut sched));
        assert_eq!(game.phase(), LoopPhase::Running);
        assert_eq!(sched.pending(), &[(1, 1)]);

        // Further resizes don't double-schedule
        assert!(!game.resize(desktop(), &mut sched));
        assert_eq!(sched.pending().len(), 1);
    }

    #[test]
    fn test_one_outstanding_request() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(1);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);

        for _ in 0..10 {
            let due = sched.take_due();
            assert_eq!(due.len(), 1);
            let (_, generation) = due[0];
            game.frame(&mut sched, generation, 0.0, &mut surface);
        }
        assert_eq!(sched.pending().len(), 1);
    }

    #[test]
    fn test_score_counts_simulated_steps() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(1);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);
        game.session_mut().career.obstacles.clear();

        let outcomes = pump(&mut game, &mut sched, &mut surface, 30);
        let steps: u64 = outcomes
            .iter()
            .map(|o| match o {
                FrameOutcome::Running { steps } => *steps as u64,
                other => panic!("unexpected {:?}", other),
            })
            .sum();
        assert!(steps >= 30);
        assert_eq!(game.session().score, steps);
        assert_eq!(surface.frames(), 30);
    }

    #[test]
    fn test_large_gap_is_capped() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(1);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);

        let (_, generation) = sched.take_due()[0];
        game.frame(&mut sched, generation, 0.0, &mut surface);
        let (_, generation) = sched.take_due()[0];
        // Tab was in the background for a minute
        let outcome = game.frame(&mut sched, generation, 60_000.0, &mut surface);
        match outcome {
            FrameOutcome::Running { steps } => assert!(steps <= MAX_SUBSTEPS),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_game_over_stops_scheduling() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(1);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);

        let x = game.session().avatar.x;
        game.session_mut().obstacles.push(Obstacle {
            pos: Vec2::new(x, 360.0),
            size: Vec2::new(80.0, 30.0),
            text: "Fired Unreasonably".into(),
            speed: 2.0,
        });

        let outcomes = pump(&mut game, &mut sched, &mut surface, 5);
        assert_eq!(outcomes, vec![FrameOutcome::GameOver { score: 1 }]);
        assert_eq!(game.phase(), LoopPhase::Stopped);
        assert!(sched.pending().is_empty());

        // A late duplicate callback changes nothing
        let before = game.session().clone();
        let outcome = game.frame(&mut sched, 1, 5000.0, &mut surface);
        assert_eq!(outcome, FrameOutcome::Stale);
        assert_eq!(game.session().score, before.score);
        assert_eq!(game.session().obstacles, before.obstacles);
        assert!(sched.pending().is_empty());
    }

    #[test]
    fn test_teardown_cancels_pending() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(4);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);
        let id = game.pending_frame().unwrap();

        game.teardown(&mut sched);
        assert_eq!(game.phase(), LoopPhase::Stopped);
        assert!(sched.pending().is_empty());
        assert_eq!(sched.cancelled(), &[id]);

        // Stale tick after teardown is a no-op
        assert_eq!(game.frame(&mut sched, 4, 16.0, &mut surface), FrameOutcome::Stale);
        assert_eq!(game.session().score, 0);
        assert_eq!(surface.frames(), 0);
    }

    #[test]
    fn test_steady_60hz_gives_one_step_per_frame() {
        let mut exact = FrameClock::new();
        let mut rounded = FrameClock::new();
        for k in 0..600 {
            let t = 1000.0 + k as f64 * SIM_DT_MS;
            assert_eq!(exact.advance(t), 1, "exact timestamps, frame {}", k);
            // Browsers often round timestamps to 0.1ms
            let t = (t * 10.0).round() / 10.0;
            assert_eq!(rounded.advance(t), 1, "rounded timestamps, frame {}", k);
        }
    }

    #[test]
    fn test_120hz_steps_every_other_frame() {
        let mut clock = FrameClock::new();
        let total: u32 = (0..240)
            .map(|k| clock.advance(1000.0 + k as f64 * SIM_DT_MS / 2.0))
            .sum();
        // 2 seconds of wall time, first frame counted as a full step
        assert!((120..=121).contains(&total), "{} steps", total);
    }

    #[test]
    fn test_wrong_generation_is_stale() {
        let mut sched = ManualScheduler::new();
        let mut surface = HeadlessSurface::new();
        let mut game = new_loop(2);
        game.resize(desktop(), &mut sched);
        game.attach_surface(&mut sched);

        assert_eq!(game.frame(&mut sched, 1, 16.0, &mut surface), FrameOutcome::Stale);
        assert_eq!(game.pending_frame(), Some(1));
    }
}
