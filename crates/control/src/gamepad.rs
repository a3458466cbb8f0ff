//! Gamepad sampling in the standard mapping: axes 0..3 are the two sticks,
//! buttons 4/5 the bumpers and 6/7 the analog triggers.

use simcore::{ControlInputs, most, most_vec, vec2};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadSnapshot {
    /// Left x, left y, right x, right y.
    pub axes: [f64; 4],
    pub left_bumper: bool,
    pub right_bumper: bool,
    pub left_trigger: f64,
    pub right_trigger: f64,
}

impl GamepadSnapshot {
    pub fn inputs(&self) -> ControlInputs {
        ControlInputs {
            left_stick: vec2(self.axes[0], self.axes[1]),
            right_stick: vec2(self.axes[2], self.axes[3]),
            left_trigger: self.left_trigger,
            right_trigger: self.right_trigger,
            left_bumper: self.left_bumper,
            right_bumper: self.right_bumper,
        }
    }
}

/// Combines two input sources. On every analog channel the value with the
/// larger magnitude wins; bumpers are held if either source holds them.
pub fn merge(a: &ControlInputs, b: &ControlInputs) -> ControlInputs {
    ControlInputs {
        left_stick: most_vec(&a.left_stick, &b.left_stick),
        right_stick: most_vec(&a.right_stick, &b.right_stick),
        left_trigger: most(a.left_trigger, b.left_trigger),
        right_trigger: most(a.right_trigger, b.right_trigger),
        left_bumper: a.left_bumper || b.left_bumper,
        right_bumper: a.right_bumper || b.right_bumper,
    }
}

/// Keyboard input, overlaid with the gamepad when one is connected.
pub fn combine(keyboard: ControlInputs, gamepad: Option<&GamepadSnapshot>) -> ControlInputs {
    match gamepad {
        Some(pad) => merge(&keyboard, &pad.inputs()),
        None => keyboard,
    }
}
