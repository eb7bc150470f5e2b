use glam::Vec2;
use std::collections::BTreeSet;

/// Direction keys the built-in systems react to. The driver maps raw key
/// codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn direction(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }
}

/// Keys currently held, as last reported by the driver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: BTreeSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn set(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Sum of the held directions. Opposite keys cancel.
    pub fn direction(&self) -> Vec2 {
        self.held.iter().map(|k| k.direction()).sum()
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_keys_add_up() {
        let mut input = InputState::new();
        input.press(Key::Up);
        input.press(Key::Right);
        assert_eq!(input.direction(), Vec2::new(1.0, 1.0));

        input.press(Key::Down);
        assert_eq!(input.direction(), Vec2::new(1.0, 0.0));

        input.release(Key::Right);
        assert!(!input.is_held(Key::Right));
        assert_eq!(input.direction(), Vec2::ZERO);
    }

    #[test]
    fn set_and_clear() {
        let mut input = InputState::new();
        input.set(Key::Left, true);
        assert!(input.is_held(Key::Left));
        input.clear();
        assert_eq!(input, InputState::new());
    }
}
