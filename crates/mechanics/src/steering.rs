use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use simcore::config::{check_non_negative, check_positive};
use simcore::{ConfigError, ControlInputs, MechanicsModel, Model, PlanarExt, SimContext, VehicleState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConstants {
    /// Squared stick magnitude treated as centred.
    pub stick_deadzone: f64,
    /// Wheel deflection at full lock and low speed.
    pub steer_gain: f64,
    /// Multiplies squared speed in the authority denominator.
    pub speed_scale: f64,
    /// Floor of the authority denominator.
    pub speed_floor: f64,
    /// Heading rotation per degree of deflection per unit of squared speed.
    pub rotation_gain: f64,
}

impl Default for SteeringConstants {
    fn default() -> Self {
        SteeringConstants {
            stick_deadzone: 0.1,
            steer_gain: 2.0,
            speed_scale: 1.0,
            speed_floor: 2.0,
            rotation_gain: 2.0,
        }
    }
}

impl SteeringConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("stick_deadzone", self.stick_deadzone)?;
        check_non_negative("steer_gain", self.steer_gain)?;
        check_non_negative("speed_scale", self.speed_scale)?;
        check_positive("speed_floor", self.speed_floor)?;
        check_non_negative("rotation_gain", self.rotation_gain)
    }
}

/// Speed-sensitive steering. The wheel deflection is recomputed from the
/// stick every tick; authority shrinks as squared speed grows.
#[derive(Debug, Clone, Default)]
pub struct SteeringModel {
    pub constants: SteeringConstants,
}

impl SteeringModel {
    pub fn new(constants: SteeringConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(SteeringModel { constants })
    }

    pub fn steer_angle(&self, inputs: &ControlInputs, speed_sq: f64) -> f64 {
        let c = &self.constants;
        let stick = inputs.left_stick.deadzoned(c.stick_deadzone);
        -stick.x * c.steer_gain / (speed_sq * c.speed_scale).max(c.speed_floor)
    }
}

impl Model for SteeringModel {
    fn reset(&mut self) {}
}

impl MechanicsModel for SteeringModel {
    fn step_physics(&mut self, _ctx: SimContext, inputs: &ControlInputs, state: &mut VehicleState) {
        let speed_sq = state.velocity.length_sq();
        state.steer_angle = self.steer_angle(inputs, speed_sq);
        // rotated in place, never renormalized
        let turn = state.steer_angle * PI / 180.0 * speed_sq * self.constants.rotation_gain;
        state.heading = state.heading.rotated(turn);
    }
}
