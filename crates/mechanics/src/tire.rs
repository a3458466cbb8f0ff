use serde::{Deserialize, Serialize};
use simcore::config::{check_non_negative, check_unit_factor};
use simcore::{ConfigError, ControlInputs, MechanicsModel, Model, PlanarExt, SimContext, Vec2, VehicleState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TireConstants {
    /// Squared speed the rolling wheel loses every tick.
    pub axle_friction: f64,
    /// Squared speed removed per unit of brake trigger.
    pub brake_coefficient: f64,
    /// Share of the shaft/road mismatch exchanged each tick.
    pub lurch_coefficient: f64,
    /// Squared tire acceleration above which the tire skids.
    pub skid_threshold: f64,
    /// Share of the tire acceleration applied while gripping.
    pub grip_fraction: f64,
    /// Share of the tire acceleration applied while skidding.
    pub skid_fraction: f64,
}

impl TireConstants {
    pub fn new(
        axle_friction: f64,
        brake_coefficient: f64,
        lurch_coefficient: f64,
        skid_threshold: f64,
        grip_fraction: f64,
        skid_fraction: f64,
    ) -> Self {
        TireConstants {
            axle_friction,
            brake_coefficient,
            lurch_coefficient,
            skid_threshold,
            grip_fraction,
            skid_fraction,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit_factor("lurch_coefficient", self.lurch_coefficient)?;
        check_unit_factor("grip_fraction", self.grip_fraction)?;
        check_unit_factor("skid_fraction", self.skid_fraction)?;
        check_non_negative("axle_friction", self.axle_friction)?;
        check_non_negative("brake_coefficient", self.brake_coefficient)?;
        check_non_negative("skid_threshold", self.skid_threshold)
    }
}

impl Default for TireConstants {
    fn default() -> Self {
        TireConstants {
            axle_friction: 0.004,
            brake_coefficient: 2.0,
            lurch_coefficient: 0.02,
            skid_threshold: 1.0,
            grip_fraction: 0.3,
            skid_fraction: 0.1,
        }
    }
}

/// Couples the drive shaft to the road through a single rear tire.
#[derive(Debug, Clone, Default)]
pub struct TireFrictionModel {
    pub constants: TireConstants,
}

impl TireFrictionModel {
    pub fn new(constants: TireConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        Ok(TireFrictionModel { constants })
    }

    /// Share of the tire acceleration applied this tick. The threshold is
    /// exclusive: exactly at it the tire still grips.
    pub fn traction_fraction(&self, acceleration_sq: f64) -> f64 {
        if acceleration_sq > self.constants.skid_threshold {
            self.constants.skid_fraction
        } else {
            self.constants.grip_fraction
        }
    }
}

/// Road speed along the heading after axle and brake friction.
pub fn braked_wheel_velocity(road_speed: &Vec2, brake: f64, tire: &TireConstants) -> Vec2 {
    road_speed.decreased_by(tire.axle_friction + brake * tire.brake_coefficient)
}

/// Exchanges `lurch_coefficient` of the shaft/road mismatch between the shaft
/// and the wheel. Whatever the wheel gains the shaft loses, and vice versa.
fn apply_lurch(state: &mut VehicleState, road_speed: &Vec2, tire: &TireConstants) {
    let rpm_lurch = state.shaft_rpm - road_speed.length_sq();
    let exchange = rpm_lurch * tire.lurch_coefficient;
    state.wheel_velocity += state.heading.unit_sq() * exchange;
    state.shaft_rpm -= exchange;
}

impl Model for TireFrictionModel {
    fn reset(&mut self) {
        // No internal state to reset in this simple model
    }
}

impl MechanicsModel for TireFrictionModel {
    fn step_physics(&mut self, ctx: SimContext, inputs: &ControlInputs, state: &mut VehicleState) {
        let tire = &self.constants;
        let road_speed = state.velocity.projected_on(&state.heading);

        state.wheel_velocity = braked_wheel_velocity(&road_speed, inputs.left_trigger, tire);
        apply_lurch(state, &road_speed, tire);

        state.tire_acceleration = state.wheel_velocity - state.velocity;
        let acceleration_sq = state.tire_acceleration.length_sq();
        let skidding = acceleration_sq > tire.skid_threshold;
        if skidding != state.skidding {
            log::debug!(
                "tick {}: tire {} (|a|²={:.3})",
                ctx.tick,
                if skidding { "lost grip" } else { "regained grip" },
                acceleration_sq
            );
        }
        state.skidding = skidding;
        state.velocity += state.tire_acceleration * self.traction_fraction(acceleration_sq);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::vec2;

    fn ctx() -> SimContext {
        SimContext { dt: 0.01, t: 0.0, tick: 0 }
    }

    #[test]
    fn test_traction_boundary_is_open_above() {
        let model = TireFrictionModel::default();
        assert_eq!(model.traction_fraction(0.5), 0.3);
        assert_eq!(model.traction_fraction(1.0), 0.3);
        assert_eq!(model.traction_fraction(1.0 + 1e-12), 0.1);
    }

    #[test]
    fn test_exactly_at_threshold_grips() {
        // shaft 50 at rest pushes the wheel to exactly (0, 1)
        let mut model = TireFrictionModel::default();
        let mut state = VehicleState::default();
        state.shaft_rpm = 50.0;
        model.step_physics(ctx(), &ControlInputs::default(), &mut state);

        assert_eq!(state.tire_acceleration.length_sq(), 1.0);
        assert!(!state.skidding);
        assert!((state.velocity.y - 0.3).abs() < 1e-12);
        assert!((state.shaft_rpm - 49.0).abs() < 1e-12);
    }

    #[test]
    fn test_just_over_threshold_skids() {
        let mut model = TireFrictionModel::default();
        let mut state = VehicleState::default();
        state.shaft_rpm = 51.0;
        model.step_physics(ctx(), &ControlInputs::default(), &mut state);

        assert!(state.skidding);
        assert!((state.velocity.y - 0.102).abs() < 1e-12);
    }

    #[test]
    fn test_lurch_is_symmetric() {
        let tire = TireConstants::default();
        let mut state = VehicleState::default();
        state.shaft_rpm = 10.0;
        let road = vec2(0.0, 2.0);
        apply_lurch(&mut state, &road, &tire);
        // mismatch 10 - 4 = 6, 2% of it moves from shaft to wheel
        assert!((state.shaft_rpm - 9.88).abs() < 1e-12);
        assert!((state.wheel_velocity.y - 0.12).abs() < 1e-12);

        let mut state = VehicleState::default();
        state.shaft_rpm = 0.0;
        apply_lurch(&mut state, &road, &tire);
        // a wheel faster than the shaft spins the shaft back up
        assert!((state.shaft_rpm - 0.08).abs() < 1e-12);
        assert!((state.wheel_velocity.y + 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_brake_removes_squared_speed() {
        let tire = TireConstants::default();
        let w = braked_wheel_velocity(&vec2(0.0, 3.0), 1.0, &tire);
        // 9 - 2.004 of squared speed remains
        assert!((w.y - 3.0 * (9.0 - 2.004) / 9.0).abs() < 1e-12);
        assert_eq!(braked_wheel_velocity(&vec2(0.0, 1.0), 1.0, &tire), Vec2::zeros());
    }

    #[test]
    fn test_sideways_velocity_is_scrubbed() {
        let mut model = TireFrictionModel::default();
        let mut state = VehicleState::default();
        state.velocity = vec2(0.5, 0.0);
        model.step_physics(ctx(), &ControlInputs::default(), &mut state);
        // the tire only rolls along the heading, so lateral speed decays
        assert!(state.velocity.x.abs() < 0.5);
        assert!(state.velocity.x > 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(TireFrictionModel::new(TireConstants::default()).is_ok());
        let bad = TireConstants::new(0.004, 2.0, 0.02, 1.0, 1.3, 0.1);
        assert!(matches!(
            TireFrictionModel::new(bad),
            Err(ConfigError::FactorOutOfRange { name: "grip_fraction", .. })
        ));
    }
}
