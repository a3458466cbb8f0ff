use nalgebra::Rotation2;
use simcore::{
    Component, ConfigError, ControlInputs, DrawList, Integrator, MechanicsModel, Model, PlanarExt, Rgba,
    SimContext, StepData, Vec2, VehicleState, WorldBounds, WrappingEuler, vec2,
};

use crate::config::VehicleConfig;
use crate::drivetrain::DrivetrainModel;
use crate::steering::SteeringModel;
use crate::tire::TireFrictionModel;

/// The single controllable vehicle: drivetrain, steering, tire and the
/// toroidal integrator, run in that order every tick.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub drivetrain: DrivetrainModel,
    pub steering: SteeringModel,
    pub tire: TireFrictionModel,
    integrator: WrappingEuler,
}

impl Vehicle {
    pub fn new(config: &VehicleConfig, bounds: WorldBounds) -> Result<Self, ConfigError> {
        config.validate()?;
        bounds.validate()?;
        Ok(Vehicle {
            drivetrain: DrivetrainModel::new(config.drivetrain.clone())?,
            steering: SteeringModel::new(config.steering.clone())?,
            tire: TireFrictionModel::new(config.tire.clone())?,
            integrator: WrappingEuler::new(bounds),
        })
    }

    pub fn bounds(&self) -> WorldBounds {
        self.integrator.bounds
    }

    /// Vehicle parked in the middle of the world.
    pub fn initial_state(&self) -> VehicleState {
        VehicleState::at(self.bounds().center())
    }

    /// One tick. The drivetrain settles shaft rpm before the tire takes its
    /// lurch share out of it.
    pub fn update(&mut self, ctx: SimContext, inputs: &ControlInputs, state: &mut VehicleState) {
        self.drivetrain.step_physics(ctx, inputs, state);
        self.steering.step_physics(ctx, inputs, state);
        self.tire.step_physics(ctx, inputs, state);
        self.integrator.step(&ctx, state);
    }
}

impl Model for Vehicle {
    fn reset(&mut self) {
        self.drivetrain.reset();
        self.steering.reset();
        self.tire.reset();
    }
}

impl Component<VehicleState> for Vehicle {
    fn step(&mut self, data: &StepData<'_>, state: &mut VehicleState) {
        self.update(data.ctx, data.inputs, state);
    }

    fn render(&self, state: &VehicleState, out: &mut DrawList) {
        let body = Rotation2::new(state.heading.heading_angle());
        let place = |local: Vec2| state.position + body * local;

        // rear axle sits 10 units behind the body origin
        let rear = vec2(-10.0, 0.0);
        for y in [-6.0, 4.0] {
            let points = rect(-5.0, y, 10.0, 2.0)
                .into_iter()
                .map(|p| place(rear + p))
                .collect();
            out.polygon(points, Rgba::BLACK);
        }

        // front wheels pivot 15 units ahead of the rear axle
        let front = rear + vec2(15.0, 0.0);
        let steer = Rotation2::new(state.steer_angle);
        for y in [-4.0, 2.0] {
            let points = rect(-5.0, y, 10.0, 2.0)
                .into_iter()
                .map(|p| place(front + steer * p))
                .collect();
            out.polygon(points, Rgba::BLACK);
        }
    }
}

fn rect(x: f64, y: f64, w: f64, h: f64) -> [Vec2; 4] {
    [vec2(x, y), vec2(x + w, y), vec2(x + w, y + h), vec2(x, y + h)]
}

/// Overlay of the per-tick tire vectors, drawn from the vehicle position.
#[derive(Debug, Clone)]
pub struct DebugVectors {
    pub enabled: bool,
    pub scale: f64,
}

impl Default for DebugVectors {
    fn default() -> Self {
        DebugVectors {
            enabled: true,
            scale: 20.0,
        }
    }
}

impl Component<VehicleState> for DebugVectors {
    fn step(&mut self, _data: &StepData<'_>, _state: &mut VehicleState) {}

    fn render(&self, state: &VehicleState, out: &mut DrawList) {
        if !self.enabled {
            return;
        }
        let from = state.position;
        let road_speed = state.velocity.projected_on(&state.heading);
        for (v, color) in [
            (state.wheel_velocity, Rgba::RED),
            (state.tire_acceleration, Rgba::GREEN),
            (state.velocity, Rgba::BLUE),
            (state.heading, Rgba::BROWN),
            (road_speed, Rgba::BROWN),
        ] {
            out.segment(from, from + v * self.scale, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::Shape;

    fn ctx(tick: u64) -> SimContext {
        SimContext { dt: 0.01, t: tick as f64 * 0.01, tick }
    }

    #[test]
    fn test_parked_vehicle_stays_put() {
        let mut vehicle = Vehicle::new(&VehicleConfig::default(), WorldBounds::default()).unwrap();
        let mut state = vehicle.initial_state();
        for i in 0..100 {
            vehicle.update(ctx(i), &ControlInputs::default(), &mut state);
        }
        assert_eq!(state.position, vec2(256.0, 256.0));
        assert_eq!(state.velocity, Vec2::zeros());
    }

    #[test]
    fn test_throttle_moves_along_heading() {
        let mut vehicle = Vehicle::new(&VehicleConfig::default(), WorldBounds::default()).unwrap();
        let mut state = vehicle.initial_state();
        let inputs = ControlInputs {
            right_trigger: 1.0,
            ..Default::default()
        };
        for i in 0..150 {
            vehicle.update(ctx(i), &inputs, &mut state);
        }
        assert!(state.velocity.y > 0.5);
        assert!(state.velocity.x.abs() < 1e-9);
        assert!(state.position.y != 256.0);
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut config = VehicleConfig::default();
        config.tire.skid_fraction = 2.0;
        assert!(Vehicle::new(&config, WorldBounds::default()).is_err());
        assert!(Vehicle::new(&VehicleConfig::default(), WorldBounds { width: -1.0, height: 1.0 }).is_err());
    }

    #[test]
    fn test_renders_four_wheels_around_position() {
        let vehicle = Vehicle::new(&VehicleConfig::default(), WorldBounds::default()).unwrap();
        let state = vehicle.initial_state();
        let mut out = DrawList::new();
        vehicle.render(&state, &mut out);
        assert_eq!(out.len(), 4);
        for shape in &out.shapes {
            let Shape::Polygon { points, .. } = shape else {
                panic!("expected polygons, got {shape:?}");
            };
            assert_eq!(points.len(), 4);
            for p in points {
                assert!((p - state.position).length_sq() < 20.0 * 20.0);
            }
        }
    }

    #[test]
    fn test_debug_vectors_toggle() {
        let state = VehicleState::default();
        let mut out = DrawList::new();
        DebugVectors::default().render(&state, &mut out);
        assert_eq!(out.len(), 5);
        out.clear();
        DebugVectors { enabled: false, scale: 20.0 }.render(&state, &mut out);
        assert!(out.is_empty());
    }
}
