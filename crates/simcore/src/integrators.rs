use std::time::Instant;

use crate::config::{TickConfig, WorldBounds};
use crate::traits::{SimContext, VehicleState};

/// A generic integration strategy trait.
pub trait Integrator {
    /// Advances the state by one tick.
    fn step(&self, ctx: &SimContext, state: &mut VehicleState);
}

/// Explicit Euler on a torus: one tick is one integration step.
///
/// Velocity is in world units per tick, so `dt` does not scale the update.
/// The tuning constants upstream assume a ~10 ms tick.
#[derive(Debug, Clone, Copy)]
pub struct WrappingEuler {
    pub bounds: WorldBounds,
}

impl WrappingEuler {
    pub fn new(bounds: WorldBounds) -> Self {
        WrappingEuler { bounds }
    }
}

impl Integrator for WrappingEuler {
    fn step(&self, _ctx: &SimContext, state: &mut VehicleState) {
        let moved = state.position + state.velocity;
        state.position = self.bounds.wrap(&moved);
    }
}

/// Measures wall-clock time between frames, clamped so a stall (a suspended
/// window, a debugger break) cannot turn into one huge physics jump.
#[derive(Debug, Clone)]
pub struct TickClock {
    last: Option<Instant>,
    max_frame_delta: f64,
}

impl TickClock {
    pub fn new(max_frame_delta: f64) -> Self {
        TickClock {
            last: None,
            max_frame_delta,
        }
    }

    /// Seconds since the previous call, at most `max_frame_delta`.
    /// The first call reports the maximum.
    pub fn delta(&mut self, now: Instant) -> f64 {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f64(),
            None => self.max_frame_delta,
        };
        self.last = Some(now);
        if elapsed > self.max_frame_delta {
            log::debug!(
                "frame delta {:.3}s clamped to {:.3}s",
                elapsed,
                self.max_frame_delta
            );
        }
        clamp_frame_delta(elapsed, self.max_frame_delta)
    }
}

pub fn clamp_frame_delta(elapsed: f64, max_frame_delta: f64) -> f64 {
    if elapsed.is_nan() {
        return 0.0;
    }
    elapsed.clamp(0.0, max_frame_delta)
}

/// Accumulates clamped frame time and hands out fixed ticks.
#[derive(Debug, Clone)]
pub struct FixedTickScheduler {
    pub config: TickConfig,
    pub accumulator: f64,
    pub t: f64,
    pub tick: u64,
}

impl FixedTickScheduler {
    pub fn new(config: TickConfig) -> Self {
        FixedTickScheduler {
            config,
            accumulator: 0.0,
            t: 0.0,
            tick: 0,
        }
    }

    /// Adds a frame's worth of time and returns how many ticks are now due.
    pub fn advance(&mut self, frame_dt: f64) -> usize {
        self.accumulator += clamp_frame_delta(frame_dt, self.config.max_frame_delta);
        let due = (self.accumulator / self.config.tick_dt).floor();
        if due < 1.0 {
            return 0;
        }
        self.accumulator -= due * self.config.tick_dt;
        due as usize
    }

    /// Context for the next tick; moves simulated time forward.
    pub fn next_context(&mut self) -> SimContext {
        let ctx = SimContext {
            dt: self.config.tick_dt,
            t: self.t,
            tick: self.tick,
        };
        self.t += self.config.tick_dt;
        self.tick += 1;
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::vec2;
    use std::time::Duration;

    fn ctx() -> SimContext {
        SimContext { dt: 0.01, t: 0.0, tick: 0 }
    }

    #[test]
    fn test_euler_moves_by_velocity_per_tick() {
        let integrator = WrappingEuler::new(WorldBounds::default());
        let mut state = VehicleState::at(vec2(10.0, 10.0));
        state.velocity = vec2(1.5, -0.5);

        integrator.step(&ctx(), &mut state);

        assert!((state.position.x - 11.5).abs() < 1e-12);
        assert!((state.position.y - 9.5).abs() < 1e-12);
    }

    #[test]
    fn test_euler_wraps_across_edges_without_touching_velocity() {
        let integrator = WrappingEuler::new(WorldBounds::default());
        let mut state = VehicleState::at(vec2(511.0, 0.5));
        state.velocity = vec2(2.0, -1.0);

        integrator.step(&ctx(), &mut state);

        assert!((state.position.x - 1.0).abs() < 1e-9);
        assert!((state.position.y - 511.5).abs() < 1e-9);
        assert_eq!(state.velocity, vec2(2.0, -1.0));
    }

    #[test]
    fn test_fixed_tick_accumulator() {
        let mut scheduler = FixedTickScheduler::new(TickConfig::default());

        // 25 ms of frame time at 10 ms ticks
        assert_eq!(scheduler.advance(0.025), 2);
        assert!((scheduler.accumulator - 0.005).abs() < 1e-9);
        assert_eq!(scheduler.advance(0.005), 1);
    }

    #[test]
    fn test_stalls_are_clamped_to_max_frame_delta() {
        let mut scheduler = FixedTickScheduler::new(TickConfig::default());
        assert_eq!(scheduler.advance(5.0), 10);
        assert_eq!(clamp_frame_delta(-1.0, 0.1), 0.0);
    }

    #[test]
    fn test_contexts_count_ticks() {
        let mut scheduler = FixedTickScheduler::new(TickConfig::default());
        let a = scheduler.next_context();
        let b = scheduler.next_context();
        assert_eq!((a.tick, b.tick), (0, 1));
        assert!((b.t - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_clock_reports_clamped_wall_time() {
        let mut clock = TickClock::new(0.1);
        let start = Instant::now();
        assert!((clock.delta(start) - 0.1).abs() < 1e-12);
        let d = clock.delta(start + Duration::from_millis(20));
        assert!((d - 0.02).abs() < 1e-9);
        let d = clock.delta(start + Duration::from_secs(3));
        assert!((d - 0.1).abs() < 1e-12);
    }
}
