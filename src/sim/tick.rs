//! Per-frame simulation step
//!
//! Order matters: score and speed first, then the avatar, then spawning, and
//! finally the obstacle sweep. A freshly spawned obstacle takes part in the
//! sweep of its own frame, and collisions compare the avatar's updated box
//! against each obstacle's box one step ahead.

use super::spawn::{TextMeasure, maybe_spawn};
use super::state::{GamePhase, GameSession};
use crate::consts::*;

/// Movement intent for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Frame simulated, still playing
    Continue,
    /// Field has no area; nothing was touched
    Skipped,
    /// Collision this frame; carries the final score
    GameOver { score: u64 },
    /// Session already over; nothing was touched
    Inactive,
}

/// Advance the session by one frame at simulated time `now_ms`
pub fn tick(
    session: &mut GameSession,
    input: &TickInput,
    now_ms: f64,
    measure: &impl TextMeasure,
) -> TickOutcome {
    if session.phase == GamePhase::GameOver {
        return TickOutcome::Inactive;
    }
    if session.field.is_empty() {
        return TickOutcome::Skipped;
    }

    session.score += 1;
    session.speed += SPEED_INCREMENT;

    move_avatar(session, input);
    maybe_spawn(session, now_ms, measure);

    if sweep_obstacles(session) {
        session.phase = GamePhase::GameOver;
        log::info!("Collision! Final score: {}", session.score);
        return TickOutcome::GameOver {
            score: session.score,
        };
    }

    TickOutcome::Continue
}

/// Both branches read the pre-move x and right is applied last, so holding
/// both keys moves a full step right.
fn move_avatar(session: &mut GameSession, input: &TickInput) {
    let max_x = super::state::Avatar::max_x(&session.field);
    let avatar = &mut session.avatar;
    let prev = avatar.x;
    let mut next = prev;
    if input.left {
        next = (prev - AVATAR_STEP).max(0.0);
    }
    if input.right {
        next = (prev + AVATAR_STEP).min(max_x);
    }
    avatar.x = next;
    avatar.clamp_to(&session.field);
}

/// Advance every obstacle, drop the ones that left the field.
///
/// Returns true if any obstacle's next box overlaps the avatar.
fn sweep_obstacles(session: &mut GameSession) -> bool {
    let avatar = session.avatar.bounds(&session.field);
    let field_height = session.field.height;
    let mut collided = false;

    session.obstacles.retain_mut(|obstacle| {
        let next = obstacle.next_bounds();
        if avatar.overlaps(&next) {
            collided = true;
        }
        obstacle.pos = next.min;
        obstacle.pos.y < field_height
    });

    collided
}
