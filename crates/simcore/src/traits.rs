use crate::vector::{Vec2, vec2};

// Input Types
/// One tick's worth of driver input. Stick axes are in `[-1, 1]`, triggers in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlInputs {
    pub left_stick: Vec2,
    pub right_stick: Vec2,
    /// Brake.
    pub left_trigger: f64,
    /// Throttle.
    pub right_trigger: f64,
    /// Shift down.
    pub left_bumper: bool,
    /// Shift up.
    pub right_bumper: bool,
}

impl ControlInputs {
    /// Clamps every analog channel into its documented range. NaN reads as zero.
    pub fn clamped(&self) -> ControlInputs {
        let axis = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        let trigger = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        ControlInputs {
            left_stick: vec2(axis(self.left_stick.x), axis(self.left_stick.y)),
            right_stick: vec2(axis(self.right_stick.x), axis(self.right_stick.y)),
            left_trigger: trigger(self.left_trigger),
            right_trigger: trigger(self.right_trigger),
            left_bumper: self.left_bumper,
            right_bumper: self.right_bumper,
        }
    }

    pub fn any_bumper(&self) -> bool {
        self.left_bumper || self.right_bumper
    }
}

// Vehicle State
/// Debounce latch for the gear selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    Idle,
    /// A bumper was pressed and has not been released yet.
    ShiftLatched,
}

impl ShiftState {
    pub fn is_latched(self) -> bool {
        self == ShiftState::ShiftLatched
    }
}

/// Everything the vehicle carries between ticks.
///
/// `wheel_velocity` and `tire_acceleration` are per-tick outputs kept around
/// for drawing and debugging only; nothing reads them on the next tick.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Direction of travel. Rotated in place every tick and never renormalized.
    pub heading: Vec2,
    pub steer_angle: f64,
    pub wheel_velocity: Vec2,
    pub tire_acceleration: Vec2,
    pub engine_rpm: f64,
    pub shaft_rpm: f64,
    pub throttle: f64,
    pub gear: usize,
    pub shift: ShiftState,
    /// Whether the tire was over the skid threshold on the last tick.
    pub skidding: bool,
}

impl Default for VehicleState {
    fn default() -> Self {
        VehicleState {
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            heading: vec2(0.0, 1.0),
            steer_angle: 0.0,
            wheel_velocity: Vec2::zeros(),
            tire_acceleration: Vec2::zeros(),
            engine_rpm: 0.0,
            shaft_rpm: 0.0,
            throttle: 0.0,
            gear: 1,
            shift: ShiftState::Idle,
            skidding: false,
        }
    }
}

impl VehicleState {
    pub fn at(position: Vec2) -> Self {
        VehicleState {
            position,
            ..Default::default()
        }
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        VehicleSnapshot {
            position: self.position,
            velocity: self.velocity,
            heading: self.heading,
            steer_angle: self.steer_angle,
            engine_rpm: self.engine_rpm,
            shaft_rpm: self.shaft_rpm,
            throttle: self.throttle,
            gear: self.gear,
            wheel_velocity: self.wheel_velocity,
            tire_acceleration: self.tire_acceleration,
        }
    }
}

/// Read-only view handed to rendering and audio after a tick completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleSnapshot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: Vec2,
    pub steer_angle: f64,
    pub engine_rpm: f64,
    pub shaft_rpm: f64,
    pub throttle: f64,
    pub gear: usize,
    pub wheel_velocity: Vec2,
    pub tire_acceleration: Vec2,
}

// Stepping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
    pub tick: u64,
}

/// What every component receives on a tick.
#[derive(Debug, Clone, Copy)]
pub struct StepData<'a> {
    pub ctx: SimContext,
    pub inputs: &'a ControlInputs,
}

pub trait Model {
    fn reset(&mut self);
}

/// A stage of the per-tick vehicle update.
pub trait MechanicsModel: Model {
    fn step_physics(&mut self, ctx: SimContext, inputs: &ControlInputs, state: &mut VehicleState);
}
