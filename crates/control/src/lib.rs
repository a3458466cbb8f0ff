//! Driver input for the vehicle
//!
//! This crate provides:
//! - Keyboard sampling with the default key layout
//! - Gamepad sampling and merging with keyboard input
//! - Scripted drivers for headless runs

pub mod driver;
pub mod gamepad;
pub mod keyboard;

pub use driver::{Driver, Scenario, ScriptedDriver, UnknownScenario};
pub use gamepad::{GamepadSnapshot, combine, merge};
pub use keyboard::{Key, KeyboardState};
