//! Input management system
//!
//! Window events arrive in pixel coordinates and are folded into an
//! [`InputState`]: a pressed-key table keyed by character, the mouse button
//! state, and the pointer position normalized to `[-1, 1]` with Y pointing up.

use std::collections::HashSet;

use crate::foundation::math::Vec2;

/// Key codes, keyed by the character the key produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(char);

impl KeyCode {
    /// W key
    pub const W: Self = Self('w');
    /// A key
    pub const A: Self = Self('a');
    /// S key
    pub const S: Self = Self('s');
    /// D key
    pub const D: Self = Self('d');
    /// I key
    pub const I: Self = Self('i');
    /// J key
    pub const J: Self = Self('j');
    /// K key
    pub const K: Self = Self('k');
    /// L key
    pub const L: Self = Self('l');
    /// Q key
    pub const Q: Self = Self('q');
    /// B key
    pub const B: Self = Self('b');
    /// Space bar
    pub const SPACE: Self = Self(' ');

    /// Key for a character; letters are case-insensitive
    pub fn from_char(c: char) -> Self {
        Self(c.to_ascii_lowercase())
    }

    /// Character of this key
    pub fn as_char(self) -> char {
        self.0
    }
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Raw window input, positions in window pixels from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key went down
    KeyPressed(KeyCode),
    /// A key went up
    KeyReleased(KeyCode),
    /// A mouse button changed state
    MouseButton {
        /// Button
        button: MouseButton,
        /// New state
        pressed: bool,
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// The pointer moved
    MouseMoved {
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
}

/// Current keyboard and pointer state
#[derive(Debug, Clone)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
    mouse_down: bool,
    pointer: Vec2,
    width: f32,
    height: f32,
}

impl InputState {
    /// Empty state for a window of the given pixel size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pressed: HashSet::new(),
            mouse_down: false,
            pointer: Vec2::zeros(),
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    /// Convert window pixels to normalized device coordinates
    pub fn normalize(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new((x / self.width - 0.5) / 0.5, -(y / self.height - 0.5) / 0.5)
    }

    /// Fold an event into the state
    ///
    /// Returns the key that was released, if the event was a key-up, so
    /// callers can act on the edge rather than the level.
    pub fn handle_event(&mut self, event: &InputEvent) -> Option<KeyCode> {
        match *event {
            InputEvent::KeyPressed(key) => {
                self.pressed.insert(key);
                None
            }
            InputEvent::KeyReleased(key) => {
                self.pressed.remove(&key);
                Some(key)
            }
            InputEvent::MouseButton { button, pressed, x, y } => {
                if button == MouseButton::Left {
                    self.mouse_down = pressed;
                }
                self.pointer = self.normalize(x, y);
                None
            }
            InputEvent::MouseMoved { x, y } => {
                self.pointer = self.normalize(x, y);
                None
            }
        }
    }

    /// Whether a key is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether the primary mouse button is held
    pub fn mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Pointer position in normalized device coordinates
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new(512, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pointer_normalization_flips_y() {
        let input = InputState::new(512, 512);
        assert_relative_eq!(input.normalize(0.0, 0.0), Vec2::new(-1.0, 1.0));
        assert_relative_eq!(input.normalize(256.0, 256.0), Vec2::new(0.0, 0.0));
        assert_relative_eq!(input.normalize(512.0, 384.0), Vec2::new(1.0, -0.5));
    }

    #[test]
    fn test_key_release_is_reported() {
        let mut input = InputState::default();
        assert_eq!(input.handle_event(&InputEvent::KeyPressed(KeyCode::from_char('B'))), None);
        assert!(input.is_key_down(KeyCode::B));
        assert_eq!(input.handle_event(&InputEvent::KeyReleased(KeyCode::B)), Some(KeyCode::B));
        assert!(!input.is_key_down(KeyCode::B));
    }

    #[test]
    fn test_left_button_tracks_mouse_down() {
        let mut input = InputState::new(100, 100);
        input.handle_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed: true, x: 75.0, y: 25.0 });
        assert!(input.mouse_down());
        assert_relative_eq!(input.pointer(), Vec2::new(0.5, 0.5));

        input.handle_event(&InputEvent::MouseButton { button: MouseButton::Right, pressed: false, x: 75.0, y: 25.0 });
        assert!(input.mouse_down());
    }
}
