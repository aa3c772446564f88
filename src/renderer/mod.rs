//! Immediate-mode rendering
//!
//! The game draws through the small `Surface` trait: the browser build uses
//! a Canvas 2D context, native builds and tests use `HeadlessSurface`.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use headless::{DrawCall, HeadlessSurface};

use glam::Vec2;

use crate::consts::*;
use crate::sim::{Aabb, GameSession, TextMeasure};

/// A 2D drawing target
pub trait Surface: TextMeasure {
    /// Wipe the whole field to transparent
    fn clear(&mut self, width: f32, height: f32);

    fn fill_rect(&mut self, rect: Aabb, color: &str);

    /// Draw `text` centered on `center`, squeezed to `max_width` if given
    fn fill_text(&mut self, text: &str, center: Vec2, font: &str, color: &str, max_width: Option<f32>);
}

/// Paint one frame of a session. Reads state only.
pub fn draw_frame(surface: &mut impl Surface, session: &GameSession) {
    let field = &session.field;
    surface.clear(field.width, field.height);

    let avatar = session.avatar.bounds(field);
    surface.fill_text(&session.career.avatar, avatar.center(), AVATAR_FONT, TEXT_COLOR, None);

    for obstacle in &session.obstacles {
        let rect = Aabb::new(obstacle.draw_pos(), obstacle.size);
        surface.fill_rect(rect, OBSTACLE_COLOR);
        surface.fill_text(
            &obstacle.text,
            rect.center(),
            OBSTACLE_FONT,
            TEXT_COLOR,
            Some(obstacle.size.x - OBSTACLE_PADDING),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Career;
    use crate::sim::{Obstacle, PlayField};
    use crate::viewport::DeviceClass;

    #[test]
    fn test_draw_order_and_positions() {
        let career = Career {
            id: "dev".into(),
            name: "Dev".into(),
            avatar: "D".into(),
            obstacles: vec![],
        };
        let mut session =
            GameSession::with_field(career, 3, PlayField::new(500.0, 400.0, DeviceClass::Desktop));
        session.obstacles.push(Obstacle {
            pos: Vec2::new(10.0, 52.0),
            size: Vec2::new(100.0, OBSTACLE_HEIGHT),
            text: "Git Merge Conflict".into(),
            speed: 2.0,
        });

        let mut surface = HeadlessSurface::new();
        draw_frame(&mut surface, &session);

        assert_eq!(
            surface.calls(),
            &[
                DrawCall::Clear {
                    width: 500.0,
                    height: 400.0
                },
                DrawCall::Text {
                    text: "D".into(),
                    center: Vec2::new(250.0, 375.0),
                    font: AVATAR_FONT.into(),
                    max_width: None,
                },
                // Painted at the pre-advance position
                DrawCall::Rect {
                    rect: Aabb::from_xywh(10.0, 50.0, 100.0, OBSTACLE_HEIGHT),
                    color: OBSTACLE_COLOR.into(),
                },
                DrawCall::Text {
                    text: "Git Merge Conflict".into(),
                    center: Vec2::new(60.0, 65.0),
                    font: OBSTACLE_FONT.into(),
                    max_width: Some(80.0),
                },
            ]
        );
    }
}
