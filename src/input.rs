//! Left/right movement intent
//!
//! Keyboard keys set the two flags independently, so both can be held at
//! once. Touch picks a side of the field by the touch x and is mutually
//! exclusive. Lifting or cancelling a touch clears both flags.

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" => Some(Direction::Left),
            "ArrowRight" | "d" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTracker {
    left: bool,
    right: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is a movement key
    pub fn key_down(&mut self, key: &str) -> bool {
        self.set_key(key, true)
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        self.set_key(key, false)
    }

    fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        match Direction::from_key(key) {
            Some(Direction::Left) => self.left = pressed,
            Some(Direction::Right) => self.right = pressed,
            None => return false,
        }
        true
    }

    /// Touch start or move at `x` (field-local pixels)
    pub fn touch(&mut self, x: f32, field_width: f32) {
        let left = x < field_width / 2.0;
        self.left = left;
        self.right = !left;
    }

    /// Touch end or cancel
    pub fn release(&mut self) {
        self.left = false;
        self.right = false;
    }

    pub fn left(&self) -> bool {
        self.left
    }

    pub fn right(&self) -> bool {
        self.right
    }

    pub fn snapshot(&self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_is_independent() {
        let mut input = InputTracker::new();
        assert!(input.key_down("ArrowLeft"));
        assert!(input.key_down("d"));
        assert!(input.left() && input.right());

        input.key_up("a");
        assert!(!input.left());
        assert!(input.right());
    }

    #[test]
    fn test_unrelated_keys_ignored() {
        let mut input = InputTracker::new();
        assert!(!input.key_down(" "));
        assert!(!input.key_down("A"));
        assert_eq!(input, InputTracker::default());
    }

    #[test]
    fn test_touch_halves_are_exclusive() {
        let mut input = InputTracker::new();
        input.touch(100.0, 500.0);
        assert!(input.left() && !input.right());

        // Sliding across the midpoint switches sides
        input.touch(300.0, 500.0);
        assert!(!input.left() && input.right());

        // Exactly on the midpoint counts as right
        input.touch(250.0, 500.0);
        assert!(input.right());
    }

    #[test]
    fn test_release_clears_keyboard_too() {
        let mut input = InputTracker::new();
        input.key_down("ArrowLeft");
        input.touch(400.0, 500.0);
        input.release();
        assert_eq!(input.snapshot(), TickInput::default());
    }
}
