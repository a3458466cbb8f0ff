use control::Driver;
use mechanics::Simulation;
use simcore::PlanarExt;

/// What a headless run did, for the end-of-session log line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub max_engine_rpm: f64,
    pub max_speed_sq: f64,
    pub skid_ticks: u64,
    pub shifts: u32,
    pub final_gear: usize,
}

/// Runs `ticks` fixed ticks, asking `driver` for inputs before each one.
pub fn run_headless(sim: &mut Simulation, driver: &mut dyn Driver, ticks: u64) -> RunSummary {
    let mut summary = RunSummary {
        final_gear: sim.state().gear,
        ..Default::default()
    };
    for _ in 0..ticks {
        let inputs = driver.inputs(sim.ticks_run(), &sim.snapshot());
        sim.tick(&inputs);

        let state = sim.state();
        summary.ticks += 1;
        summary.max_engine_rpm = summary.max_engine_rpm.max(state.engine_rpm);
        summary.max_speed_sq = summary.max_speed_sq.max(state.velocity.length_sq());
        if state.skidding {
            summary.skid_ticks += 1;
        }
        if state.gear != summary.final_gear {
            summary.shifts += 1;
            summary.final_gear = state.gear;
        }
    }
    summary
}
