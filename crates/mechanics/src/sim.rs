use simcore::{
    Component, ConfigError, ControlInputs, DrawList, FixedTickScheduler, Rgba, SceneGraph, SimContext, StepData,
    TickConfig, VehicleSnapshot, VehicleState, WorldBounds, vec2,
};

use crate::audio::{AudioConstants, SoundCues};
use crate::config::VehicleConfig;
use crate::telemetry::{Channel, Trace, TraceSample};
use crate::vehicle::{DebugVectors, Vehicle};

/// Owns the vehicle state and steps every scene component once per tick.
pub struct Simulation {
    state: VehicleState,
    scene: SceneGraph<VehicleState>,
    scheduler: FixedTickScheduler,
    trace: Trace,
    cues: SoundCues,
    audio: AudioConstants,
    last_context: Option<SimContext>,
}

impl Simulation {
    pub fn new(config: &VehicleConfig, bounds: WorldBounds, tick: TickConfig) -> Result<Self, ConfigError> {
        tick.validate()?;
        let vehicle = Vehicle::new(config, bounds)?;
        let state = vehicle.initial_state();

        let mut scene = SceneGraph::new();
        scene.add(Box::new(vehicle));
        scene.add(Box::new(DebugVectors::default()));

        log::info!(
            "simulation ready: world {}x{}, tick {} s, {} gears",
            bounds.width,
            bounds.height,
            tick.tick_dt,
            config.drivetrain.max_gear
        );

        Ok(Simulation {
            state,
            scene,
            scheduler: FixedTickScheduler::new(tick),
            trace: Trace::default(),
            cues: SoundCues::default(),
            audio: config.audio.clone(),
            last_context: None,
        })
    }

    /// Runs exactly one tick with the given inputs.
    pub fn tick(&mut self, inputs: &ControlInputs) {
        let inputs = inputs.clamped();
        let ctx = self.scheduler.next_context();
        let data = StepData { ctx, inputs: &inputs };
        let before = self.state.clone();
        self.scene.step(&data, &mut self.state);

        let sample = TraceSample::between(&before, &self.state);
        self.trace.record(ctx.tick, &sample);
        self.cues = SoundCues::compute(&sample, &inputs, &self.audio);
        self.last_context = Some(ctx);

        log::trace!(
            "tick {}: pos=({:.2}, {:.2}) vel=({:.3}, {:.3}) skid={}",
            ctx.tick,
            self.state.position.x,
            self.state.position.y,
            self.state.velocity.x,
            self.state.velocity.y,
            self.state.skidding
        );
    }

    /// Feeds a frame's elapsed time and runs every tick that became due,
    /// all with the same inputs. Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f64, inputs: &ControlInputs) -> usize {
        let due = self.scheduler.advance(frame_dt);
        for _ in 0..due {
            self.tick(inputs);
        }
        due
    }

    /// Draws every component, then the latest trace readouts in the top-left
    /// corner of the world.
    pub fn render(&self, out: &mut DrawList) {
        self.scene.render(&self.state, out);
        let x = (self.trace.len() as f64).min(450.0);
        for (row, channel) in Channel::ALL.into_iter().enumerate() {
            if let Some(value) = self.trace.last(channel) {
                out.text(vec2(x, row as f64 * 20.0), format!("{}: {:.2}", channel.label(), value), Rgba::BLACK);
            }
        }
    }

    pub fn add_component(&mut self, component: Box<dyn Component<VehicleState>>) {
        self.scene.add(component);
    }

    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut VehicleState {
        &mut self.state
    }

    pub fn snapshot(&self) -> VehicleSnapshot {
        self.state.snapshot()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Replaces the trace with an empty one holding up to `len` samples.
    pub fn set_trace_len(&mut self, len: usize) {
        self.trace = Trace::new(len);
    }

    pub fn cues(&self) -> &SoundCues {
        &self.cues
    }

    pub fn ticks_run(&self) -> u64 {
        self.scheduler.tick
    }

    pub fn last_context(&self) -> Option<SimContext> {
        self.last_context
    }
}
