//! Obstacle spawning
//!
//! Every `OBSTACLE_FREQUENCY_MS` a random text from the career vocabulary
//! becomes an obstacle whose width hugs the rendered label.

use glam::Vec2;
use rand::Rng;

use super::state::{GameSession, Obstacle, PlayField};
use crate::consts::*;

/// Text measurement facility of a drawing surface
pub trait TextMeasure {
    /// Rendered width in pixels of `text` drawn with a CSS `font`
    fn measure_text(&self, text: &str, font: &str) -> f32;
}

/// Width of an obstacle for a measured label width.
///
/// Lower bound first, upper bound last: on fields narrower than
/// `OBSTACLE_MIN_WIDTH / 0.8` the field-relative cap wins.
pub fn fit_width(measured: f32, field: &PlayField) -> f32 {
    (measured + OBSTACLE_PADDING * 2.0)
        .max(OBSTACLE_MIN_WIDTH)
        .min(field.max_obstacle_width())
}

/// Spawn an obstacle if the spawn interval has elapsed at `now_ms`.
///
/// Returns the index of the new obstacle.
pub fn maybe_spawn(
    session: &mut GameSession,
    now_ms: f64,
    measure: &impl TextMeasure,
) -> Option<usize> {
    if session.field.is_empty() || now_ms - session.last_spawn_ms <= OBSTACLE_FREQUENCY_MS {
        return None;
    }
    session.last_spawn_ms = now_ms;
    spawn_obstacle(session, measure)
}

/// Manufacture one obstacle unconditionally
pub fn spawn_obstacle(session: &mut GameSession, measure: &impl TextMeasure) -> Option<usize> {
    let field = session.field;
    if field.is_empty() {
        return None;
    }

    let vocabulary = &session.career.obstacles;
    if vocabulary.is_empty() {
        log::warn!("Career '{}' has nothing to spawn", session.career.id);
        return None;
    }
    let text = vocabulary[session.rng.random_range(0..vocabulary.len())].clone();

    let width = fit_width(measure.measure_text(&text, OBSTACLE_FONT), &field);
    let span = field.width - width;
    let x = if span > 0.0 {
        session.rng.random_range(0.0..span)
    } else {
        0.0
    };

    log::debug!(
        "Spawned '{}' at x={:.1} w={:.1} speed={:.4}",
        text,
        x,
        width,
        session.speed
    );

    session.obstacles.push(Obstacle {
        pos: Vec2::new(x, -OBSTACLE_HEIGHT),
        size: Vec2::new(width, OBSTACLE_HEIGHT),
        text,
        speed: session.speed,
    });
    Some(session.obstacles.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Career;
    use crate::viewport::DeviceClass;

    /// Every character is `px` wide
    struct FixedMeasure(f32);

    impl TextMeasure for FixedMeasure {
        fn measure_text(&self, text: &str, _font: &str) -> f32 {
            text.chars().count() as f32 * self.0
        }
    }

    fn session(words: &[&str], width: f32) -> GameSession {
        let career = Career {
            id: "test".into(),
            name: "Test".into(),
            avatar: "@".into(),
            obstacles: words.iter().map(|w| w.to_string()).collect(),
        };
        GameSession::with_field(career, 42, PlayField::new(width, 400.0, DeviceClass::Desktop))
    }

    #[test]
    fn test_fit_width_bounds() {
        let field = PlayField::new(500.0, 400.0, DeviceClass::Desktop);
        assert_eq!(fit_width(0.0, &field), OBSTACLE_MIN_WIDTH);
        assert_eq!(fit_width(100.0, &field), 140.0);
        assert_eq!(fit_width(1000.0, &field), OBSTACLE_MAX_WIDTH);

        let narrow = PlayField::new(200.0, 400.0, DeviceClass::Mobile);
        assert_eq!(fit_width(1000.0, &narrow), 160.0);

        // Cap below the minimum: the cap wins
        let tiny = PlayField::new(50.0, 400.0, DeviceClass::Mobile);
        assert_eq!(fit_width(10.0, &tiny), 40.0);
    }

    #[test]
    fn test_interval_threshold() {
        let mut s = session(&["Meeting"], 500.0);
        let measure = FixedMeasure(6.0);
        assert!(maybe_spawn(&mut s, 1500.0, &measure).is_none());
        assert!(maybe_spawn(&mut s, 1500.5, &measure).is_some());
        assert_eq!(s.last_spawn_ms, 1500.5);
        // Next one waits a full interval again
        assert!(maybe_spawn(&mut s, 2900.0, &measure).is_none());
        assert!(maybe_spawn(&mut s, 3001.0, &measure).is_some());
        assert_eq!(s.obstacles.len(), 2);
    }

    #[test]
    fn test_spawned_obstacle_shape() {
        let mut s = session(&["Scope Creep"], 500.0);
        s.speed = 2.5;
        let idx = spawn_obstacle(&mut s, &FixedMeasure(10.0)).unwrap();
        let o = &s.obstacles[idx];
        assert_eq!(o.text, "Scope Creep");
        assert_eq!(o.size, Vec2::new(150.0, OBSTACLE_HEIGHT));
        assert_eq!(o.pos.y, -OBSTACLE_HEIGHT);
        assert_eq!(o.speed, 2.5);
        assert!(o.pos.x >= 0.0 && o.pos.x + o.size.x <= 500.0);
    }

    #[test]
    fn test_empty_vocabulary_consumes_cycle() {
        let mut s = session(&[], 500.0);
        assert!(maybe_spawn(&mut s, 2000.0, &FixedMeasure(6.0)).is_none());
        assert!(s.obstacles.is_empty());
        assert_eq!(s.last_spawn_ms, 2000.0);
    }

    #[test]
    fn test_empty_field_skips() {
        let mut s = session(&["Burnout"], 500.0);
        s.resize(PlayField::new(500.0, 0.0, DeviceClass::Mobile));
        assert!(maybe_spawn(&mut s, 5000.0, &FixedMeasure(6.0)).is_none());
        assert_eq!(s.last_spawn_ms, 0.0);
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let mut a = session(&["One", "Two", "Three", "Four"], 500.0);
        let mut b = session(&["One", "Two", "Three", "Four"], 500.0);
        for _ in 0..10 {
            spawn_obstacle(&mut a, &FixedMeasure(6.0));
            spawn_obstacle(&mut b, &FixedMeasure(6.0));
        }
        assert_eq!(a.obstacles, b.obstacles);
    }
}
