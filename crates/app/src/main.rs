mod config;
mod run;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use control::Scenario;
use log::LevelFilter;
use mechanics::Simulation;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::config::{SimConfig, parse_level};
use crate::run::run_headless;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless fixed-tick kart simulation")]
struct Cli {
    /// JSON configuration file. Defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// idle, launch, brake, slalom or shift-up
    #[arg(long, default_value = "launch")]
    scenario: Scenario,

    /// Write the per-tick drivetrain trace as CSV.
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Overrides `log_level` from the config file.
    #[arg(long)]
    log_level: Option<String>,

    /// Also log to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

fn init_logging(level: LevelFilter, log_file: Option<&PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(level, simplelog::Config::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let level = parse_level(cli.log_level.as_deref().unwrap_or(&config.log_level))?;
    init_logging(level, cli.log_file.as_ref())?;

    let mut sim = Simulation::new(&config.vehicle, config.world, config.tick)?;
    if cli.trace_out.is_some() {
        sim.set_trace_len(cli.ticks.max(1) as usize);
    }

    log::info!("running scenario `{}` for {} ticks", cli.scenario, cli.ticks);
    let mut driver = cli.scenario.driver();
    let summary = run_headless(&mut sim, &mut driver, cli.ticks);

    let end = sim.snapshot();
    log::info!(
        "done after {} ticks ({:.2} s simulated): gear {} after {} shifts, max rpm {:.1}, max speed² {:.3}, skidding {} ticks",
        summary.ticks,
        summary.ticks as f64 * config.tick.tick_dt,
        summary.final_gear,
        summary.shifts,
        summary.max_engine_rpm,
        summary.max_speed_sq,
        summary.skid_ticks
    );
    log::info!(
        "final position ({:.1}, {:.1}), velocity ({:.3}, {:.3})",
        end.position.x,
        end.position.y,
        end.velocity.x,
        end.velocity.y
    );

    if let Some(path) = &cli.trace_out {
        let mut out = BufWriter::new(File::create(path)?);
        sim.trace().write_csv(&mut out)?;
        out.flush()?;
        log::info!("wrote {} trace samples to {}", sim.trace().len(), path.display());
    }

    Ok(())
}
