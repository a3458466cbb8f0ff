//! Keyboard sampling
//!
//! Tracks held keys from press/release events and turns them into a
//! [`ControlInputs`] snapshot once per tick.

use std::collections::HashSet;

use simcore::{ControlInputs, vec2};

/// Keys the driver layout cares about. Anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    ShiftLeft,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Applies a press (`down = true`) or release event.
    pub fn set(&mut self, key: Key, down: bool) {
        if down {
            self.press(key);
        } else {
            self.release(key);
        }
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// `1` for `plus` held, `-1` for `minus` held, `0` for both or neither.
    fn axis(&self, plus: Key, minus: Key) -> f64 {
        self.level(plus) - self.level(minus)
    }

    fn level(&self, key: Key) -> f64 {
        if self.is_down(key) { 1.0 } else { 0.0 }
    }

    /// WASD is the left stick, the arrows the right stick. Space brakes,
    /// left shift is throttle, Q and E shift down and up.
    pub fn sample(&self) -> ControlInputs {
        ControlInputs {
            left_stick: vec2(self.axis(Key::D, Key::A), self.axis(Key::W, Key::S)),
            right_stick: vec2(
                self.axis(Key::ArrowRight, Key::ArrowLeft),
                self.axis(Key::ArrowUp, Key::ArrowDown),
            ),
            left_trigger: self.level(Key::Space),
            right_trigger: self.level(Key::ShiftLeft),
            left_bumper: self.is_down(Key::Q),
            right_bumper: self.is_down(Key::E),
        }
    }
}
