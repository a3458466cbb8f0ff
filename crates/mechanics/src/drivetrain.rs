use serde::{Deserialize, Serialize};
use simcore::config::{check_non_negative, check_positive, check_unit_factor};
use simcore::{ConfigError, ControlInputs, MechanicsModel, Model, ShiftState, SimContext, VehicleState};

/// Gear ratios indexed directly by gear number.
///
/// Selectable gears are `1..=max_gear`; entry 0 is never selected, and
/// entries past `max_gear` are carried but unreachable.
#[derive(Debug, Clone, PartialEq)]
pub struct GearTable {
    ratios: Vec<f64>,
    max_gear: usize,
}

impl GearTable {
    pub fn new(ratios: Vec<f64>, max_gear: usize) -> Result<Self, ConfigError> {
        if ratios.is_empty() {
            return Err(ConfigError::EmptyGearTable);
        }
        if max_gear == 0 || max_gear >= ratios.len() {
            return Err(ConfigError::MaxGearOutOfTable {
                max_gear,
                len: ratios.len(),
            });
        }
        if let Some((index, &ratio)) = ratios
            .iter()
            .enumerate()
            .find(|(_, r)| !(r.is_finite() && **r > 0.0))
        {
            return Err(ConfigError::InvalidGearRatio { index, ratio });
        }
        Ok(GearTable { ratios, max_gear })
    }

    pub fn max_gear(&self) -> usize {
        self.max_gear
    }

    pub fn clamp(&self, gear: usize) -> usize {
        gear.clamp(1, self.max_gear)
    }

    pub fn ratio(&self, gear: usize) -> f64 {
        self.ratios[self.clamp(gear)]
    }

    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }
}

impl Default for GearTable {
    fn default() -> Self {
        GearTable {
            ratios: DrivetrainConstants::default().gear_ratios,
            max_gear: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainConstants {
    pub gear_ratios: Vec<f64>,
    pub max_gear: usize,
    /// Weight of the new trigger sample in the throttle low-pass.
    pub throttle_blend: f64,
    /// Weight of the new target in the engine rpm low-pass.
    pub rpm_blend: f64,
    /// Engine rpm per unit of shaft rpm times gear ratio.
    pub rpm_per_shaft: f64,
    /// Added to the engine rpm target so the engine idles above zero.
    pub idle_rpm: f64,
    /// Engine power per unit of throttle.
    pub power_per_throttle: f64,
    /// Below this engine rpm the shaft spins up proportionally to rpm.
    pub low_rpm: f64,
    /// Rev limiter threshold.
    pub high_rpm: f64,
    /// Shaft rpm removed per unit of over-rev each tick.
    pub limiter_gain: f64,
    /// Smallest over-rev the limiter acts on.
    pub limiter_min_step: f64,
    /// Multiplicative shaft drag applied once per tick.
    pub shaft_drag: f64,
}

impl Default for DrivetrainConstants {
    fn default() -> Self {
        DrivetrainConstants {
            gear_ratios: vec![
                10.0,
                4.0,
                2.0,
                1.0,
                1.0 / 2.0,
                1.0 / 3.0,
                1.0 / 4.0,
                1.0 / 5.0,
                1.0 / 6.0,
                1.0 / 7.0,
            ],
            max_gear: 5,
            throttle_blend: 0.1,
            rpm_blend: 0.1,
            rpm_per_shaft: 2.0,
            idle_rpm: 5.0,
            power_per_throttle: 0.25,
            low_rpm: 30.0,
            high_rpm: 200.0,
            limiter_gain: 0.01,
            limiter_min_step: 1.0,
            shaft_drag: 0.999,
        }
    }
}

impl DrivetrainConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        GearTable::new(self.gear_ratios.clone(), self.max_gear)?;
        check_unit_factor("throttle_blend", self.throttle_blend)?;
        check_unit_factor("rpm_blend", self.rpm_blend)?;
        check_unit_factor("shaft_drag", self.shaft_drag)?;
        check_non_negative("rpm_per_shaft", self.rpm_per_shaft)?;
        check_non_negative("idle_rpm", self.idle_rpm)?;
        check_non_negative("power_per_throttle", self.power_per_throttle)?;
        check_non_negative("limiter_gain", self.limiter_gain)?;
        check_non_negative("limiter_min_step", self.limiter_min_step)?;
        check_positive("low_rpm", self.low_rpm)?;
        if !self.high_rpm.is_finite() || self.low_rpm >= self.high_rpm {
            return Err(ConfigError::RpmThresholdOrder {
                low: self.low_rpm,
                high: self.high_rpm,
            });
        }
        Ok(())
    }
}

/// Applies the debounced gear selector for one tick.
///
/// Releasing both bumpers re-arms the latch. While armed, a held bumper
/// shifts once and latches, so holding it produces exactly one shift.
/// Returns the new gear.
pub fn apply_shift(gears: &GearTable, inputs: &ControlInputs, state: &mut VehicleState) -> usize {
    if !inputs.any_bumper() {
        state.shift = ShiftState::Idle;
    }
    if state.shift == ShiftState::Idle {
        if inputs.left_bumper {
            state.gear = gears.clamp(state.gear.saturating_sub(1));
            state.shift = ShiftState::ShiftLatched;
        }
        if inputs.right_bumper {
            state.gear = gears.clamp(state.gear + 1);
            state.shift = ShiftState::ShiftLatched;
        }
    }
    state.gear
}

/// Throttle, gear selection, engine rpm and shaft rpm.
#[derive(Debug, Clone)]
pub struct DrivetrainModel {
    constants: DrivetrainConstants,
    gears: GearTable,
}

impl DrivetrainModel {
    pub fn new(constants: DrivetrainConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        let gears = GearTable::new(constants.gear_ratios.clone(), constants.max_gear)?;
        Ok(DrivetrainModel { constants, gears })
    }

    pub fn constants(&self) -> &DrivetrainConstants {
        &self.constants
    }

    /// Gear table built from the constants at construction.
    pub fn gears(&self) -> &GearTable {
        &self.gears
    }

    /// Low-passed engine rpm target for the current shaft speed and gear.
    pub fn engine_rpm_target(&self, shaft_rpm: f64, gear: usize) -> f64 {
        (self.constants.rpm_per_shaft * shaft_rpm * self.gears.ratio(gear)).max(0.0)
            + self.constants.idle_rpm
    }

    /// Shaft rpm change for one tick, before drag.
    pub fn shaft_rpm_delta(&self, engine_rpm: f64, shaft_rpm: f64, throttle: f64) -> f64 {
        let c = &self.constants;
        let power = throttle * c.power_per_throttle;
        if engine_rpm < c.low_rpm {
            power * engine_rpm / c.low_rpm
        } else if engine_rpm < c.high_rpm {
            power.min(c.high_rpm - engine_rpm)
        } else {
            let over_rev = (engine_rpm - c.high_rpm).min(engine_rpm - shaft_rpm);
            -over_rev.max(c.limiter_min_step) * c.limiter_gain
        }
    }
}

impl Default for DrivetrainModel {
    fn default() -> Self {
        DrivetrainModel {
            constants: DrivetrainConstants::default(),
            gears: GearTable::default(),
        }
    }
}

impl Model for DrivetrainModel {
    fn reset(&mut self) {
        // Configuration only; all drivetrain state lives in VehicleState
    }
}

impl MechanicsModel for DrivetrainModel {
    fn step_physics(&mut self, ctx: SimContext, inputs: &ControlInputs, state: &mut VehicleState) {
        let throttle_blend = self.constants.throttle_blend;
        state.throttle = inputs.right_trigger * throttle_blend + state.throttle * (1.0 - throttle_blend);

        let previous_gear = state.gear;
        let gear = apply_shift(&self.gears, inputs, state);
        if gear != previous_gear {
            log::debug!("tick {}: shifted {} -> {}", ctx.tick, previous_gear, gear);
        }

        let rpm_blend = self.constants.rpm_blend;
        state.engine_rpm = state.engine_rpm * (1.0 - rpm_blend)
            + rpm_blend * self.engine_rpm_target(state.shaft_rpm, gear);

        state.shaft_rpm += self.shaft_rpm_delta(state.engine_rpm, state.shaft_rpm, state.throttle);
        state.shaft_rpm *= self.constants.shaft_drag;
        state.shaft_rpm = state.shaft_rpm.max(0.0);

        log::trace!(
            "tick {}: throttle={:.3} gear={} rpm={:.2} shaft={:.3}",
            ctx.tick,
            state.throttle,
            gear,
            state.engine_rpm,
            state.shaft_rpm
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SimContext {
        SimContext { dt: 0.01, t: 0.0, tick: 0 }
    }

    fn bumpers(left: bool, right: bool) -> ControlInputs {
        ControlInputs {
            left_bumper: left,
            right_bumper: right,
            ..Default::default()
        }
    }

    #[test]
    fn test_gear_table_validation() {
        assert!(matches!(GearTable::new(vec![], 1), Err(ConfigError::EmptyGearTable)));
        assert!(matches!(
            GearTable::new(vec![1.0, 2.0], 2),
            Err(ConfigError::MaxGearOutOfTable { max_gear: 2, len: 2 })
        ));
        assert!(matches!(
            GearTable::new(vec![1.0, -2.0, 3.0], 2),
            Err(ConfigError::InvalidGearRatio { index: 1, .. })
        ));
        let table = GearTable::new(vec![10.0, 4.0, 2.0], 2).unwrap();
        assert_eq!(table.ratio(1), 4.0);
        assert_eq!(table.ratio(0), 4.0);
    }

    #[test]
    fn test_held_bumper_shifts_once() {
        let gears = GearTable::default();
        let mut state = VehicleState::default();

        for _ in 0..25 {
            apply_shift(&gears, &bumpers(false, true), &mut state);
        }
        assert_eq!(state.gear, 2);
        assert!(state.shift.is_latched());

        apply_shift(&gears, &bumpers(false, false), &mut state);
        assert_eq!(state.shift, ShiftState::Idle);
        for _ in 0..5 {
            apply_shift(&gears, &bumpers(false, true), &mut state);
        }
        assert_eq!(state.gear, 3);
    }

    #[test]
    fn test_switching_bumpers_while_latched_does_not_shift() {
        let gears = GearTable::default();
        let mut state = VehicleState::default();
        apply_shift(&gears, &bumpers(false, true), &mut state);
        apply_shift(&gears, &bumpers(true, true), &mut state);
        apply_shift(&gears, &bumpers(true, false), &mut state);
        assert_eq!(state.gear, 2);
    }

    #[test]
    fn test_gear_stays_in_range_under_spam() {
        let gears = GearTable::default();
        let mut state = VehicleState::default();
        for i in 0..200 {
            let press = i % 2 == 0;
            apply_shift(&gears, &bumpers(false, press), &mut state);
            assert!((1..=5).contains(&state.gear));
        }
        assert_eq!(state.gear, 5);
        for i in 0..200 {
            let press = i % 2 == 0;
            apply_shift(&gears, &bumpers(press, false), &mut state);
            assert!((1..=5).contains(&state.gear));
        }
        assert_eq!(state.gear, 1);
    }

    #[test]
    fn test_throttle_low_pass() {
        let mut model = DrivetrainModel::default();
        let mut state = VehicleState::default();
        let inputs = ControlInputs {
            right_trigger: 1.0,
            ..Default::default()
        };
        model.step_physics(ctx(), &inputs, &mut state);
        assert!((state.throttle - 0.1).abs() < 1e-12);
        model.step_physics(ctx(), &inputs, &mut state);
        assert!((state.throttle - 0.19).abs() < 1e-12);
    }

    #[test]
    fn test_engine_idles_at_rest() {
        let mut model = DrivetrainModel::default();
        let mut state = VehicleState::default();
        let inputs = ControlInputs::default();
        for _ in 0..500 {
            model.step_physics(ctx(), &inputs, &mut state);
        }
        assert!((state.engine_rpm - 5.0).abs() < 1e-6);
        assert_eq!(state.shaft_rpm, 0.0);
    }

    #[test]
    fn test_shaft_delta_regions() {
        let model = DrivetrainModel::default();
        // soft start: power 0.25 scaled by 15 / 30
        assert!((model.shaft_rpm_delta(15.0, 0.0, 1.0) - 0.125).abs() < 1e-12);
        // power limited climb
        assert!((model.shaft_rpm_delta(100.0, 10.0, 1.0) - 0.25).abs() < 1e-12);
        assert!((model.shaft_rpm_delta(199.9, 10.0, 1.0) - 0.1).abs() < 1e-9);
        // limiter, bounded below by the minimum step
        assert!((model.shaft_rpm_delta(200.5, 20.0, 1.0) + 0.01).abs() < 1e-12);
        assert!((model.shaft_rpm_delta(230.0, 20.0, 1.0) + 0.3).abs() < 1e-12);
        assert!((model.shaft_rpm_delta(230.0, 225.0, 1.0) + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_shaft_never_negative() {
        let mut model = DrivetrainModel::default();
        let mut state = VehicleState::default();
        state.engine_rpm = 1000.0;
        state.shaft_rpm = 0.001;
        model.step_physics(ctx(), &ControlInputs::default(), &mut state);
        assert_eq!(state.shaft_rpm, 0.0);
        assert!(state.engine_rpm >= 0.0);
    }

    #[test]
    fn test_constants_validation() {
        assert!(DrivetrainConstants::default().validate().is_ok());
        let bad = DrivetrainConstants {
            low_rpm: 300.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::RpmThresholdOrder { .. })));
        let bad = DrivetrainConstants {
            throttle_blend: 1.5,
            ..Default::default()
        };
        assert!(DrivetrainModel::new(bad).is_err());
    }

    #[test]
    fn test_negative_gains_are_rejected() {
        let bad = DrivetrainConstants {
            idle_rpm: -10.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(ConfigError::Negative { name: "idle_rpm", .. })));
        for bad in [
            DrivetrainConstants {
                power_per_throttle: -1.0,
                ..Default::default()
            },
            DrivetrainConstants {
                rpm_per_shaft: -2.0,
                ..Default::default()
            },
            DrivetrainConstants {
                limiter_gain: -0.01,
                ..Default::default()
            },
            DrivetrainConstants {
                limiter_min_step: f64::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(bad.validate(), Err(ConfigError::Negative { .. })));
        }
    }

    #[test]
    fn test_gear_table_matches_constants() {
        let constants = DrivetrainConstants {
            max_gear: 3,
            ..Default::default()
        };
        let model = DrivetrainModel::new(constants).unwrap();
        assert_eq!(model.gears().max_gear(), model.constants().max_gear);
        assert_eq!(model.gears().ratios(), model.constants().gear_ratios.as_slice());
    }
}
