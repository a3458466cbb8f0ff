//! Scripted drivers for headless runs.

use std::fmt;
use std::str::FromStr;

use simcore::{ControlInputs, VehicleSnapshot, vec2};
use thiserror::Error;

/// Anything that can produce one tick of input from what the vehicle is doing.
pub trait Driver {
    fn inputs(&mut self, tick: u64, vehicle: &VehicleSnapshot) -> ControlInputs;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Hands off. The vehicle stays parked.
    Idle,
    /// Full throttle in first gear.
    Launch,
    /// Full throttle, then full brake from `BRAKE_AT` on.
    Brake,
    /// Part throttle with the stick swinging between full left and full right.
    Slalom,
    /// Full throttle, tapping shift-up whenever the engine nears the limiter.
    ShiftUp,
}

impl Scenario {
    pub const ALL: [Scenario; 5] = [
        Scenario::Idle,
        Scenario::Launch,
        Scenario::Brake,
        Scenario::Slalom,
        Scenario::ShiftUp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Idle => "idle",
            Scenario::Launch => "launch",
            Scenario::Brake => "brake",
            Scenario::Slalom => "slalom",
            Scenario::ShiftUp => "shift-up",
        }
    }

    pub fn driver(self) -> ScriptedDriver {
        ScriptedDriver::new(self)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scenario `{0}` (expected idle, launch, brake, slalom or shift-up)")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownScenario(s.to_string()))
    }
}

pub const BRAKE_AT: u64 = 300;
pub const SLALOM_WARMUP: u64 = 100;
pub const SLALOM_HALF_PERIOD: u64 = 150;
pub const SHIFT_RPM: f64 = 180.0;
/// Ticks the shift bumper is held for each tap.
pub const SHIFT_HOLD: u64 = 5;
/// Minimum ticks between the start of two taps.
pub const SHIFT_COOLDOWN: u64 = 50;

#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    pub scenario: Scenario,
    last_shift: Option<u64>,
}

impl ScriptedDriver {
    pub fn new(scenario: Scenario) -> Self {
        ScriptedDriver {
            scenario,
            last_shift: None,
        }
    }

    fn throttle(amount: f64) -> ControlInputs {
        ControlInputs {
            right_trigger: amount,
            ..Default::default()
        }
    }

    fn shift_up(&mut self, tick: u64, vehicle: &VehicleSnapshot) -> ControlInputs {
        let mut inputs = Self::throttle(1.0);
        match self.last_shift {
            Some(start) if tick < start + SHIFT_HOLD => inputs.right_bumper = true,
            Some(start) if tick < start + SHIFT_COOLDOWN => {}
            _ if vehicle.engine_rpm > SHIFT_RPM => {
                log::debug!("tick {tick}: driver shifting up from gear {}", vehicle.gear);
                self.last_shift = Some(tick);
                inputs.right_bumper = true;
            }
            _ => {}
        }
        inputs
    }
}

impl Driver for ScriptedDriver {
    fn inputs(&mut self, tick: u64, vehicle: &VehicleSnapshot) -> ControlInputs {
        match self.scenario {
            Scenario::Idle => ControlInputs::default(),
            Scenario::Launch => Self::throttle(1.0),
            Scenario::Brake if tick < BRAKE_AT => Self::throttle(1.0),
            Scenario::Brake => ControlInputs {
                left_trigger: 1.0,
                ..Default::default()
            },
            Scenario::Slalom if tick < SLALOM_WARMUP => Self::throttle(0.6),
            Scenario::Slalom => {
                let side = if ((tick - SLALOM_WARMUP) / SLALOM_HALF_PERIOD) % 2 == 0 { 1.0 } else { -1.0 };
                ControlInputs {
                    left_stick: vec2(side, 0.0),
                    ..Self::throttle(0.6)
                }
            }
            Scenario::ShiftUp => self.shift_up(tick, vehicle),
        }
    }
}
