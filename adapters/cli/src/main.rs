#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver that runs a launch and prints numeric frame state.

mod report;
mod scenario;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use liftoff_core::{Command, Event};
use liftoff_world::{self as world, World};

use crate::{report::FrameReport, scenario::Scenario};

/// Runs a rocket launch through the particle and motion kernel.
#[derive(Debug, Parser)]
#[command(name = "liftoff", version, about)]
struct Cli {
    /// Scenario file in TOML; the built-in launch is used when omitted.
    #[arg(long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Overrides the scenario seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the frames simulated per second.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    fps: Option<u32>,

    /// Overrides the number of frames to simulate.
    #[arg(long)]
    frames: Option<u32>,

    /// Output format of the frame reports.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Prints the effective scenario as TOML and exits.
    #[arg(long)]
    print_scenario: bool,

    /// Increases log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only logs errors.
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Entry point for the Liftoff command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = log_level(cli.verbose, cli.quiet);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .init();

    let scenario = effective_scenario(&cli)?;
    if cli.print_scenario {
        let toml = toml::to_string_pretty(&scenario).context("failed to render scenario")?;
        print!("{toml}");
        return Ok(());
    }

    run(&scenario, cli.format)
}

/// Default log filter for the verbosity flags. `RUST_LOG` still takes
/// precedence when set.
fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    match (verbose, quiet) {
        (0, true) => log::LevelFilter::Error,
        (0, false) => log::LevelFilter::Warn,
        (1, _) => log::LevelFilter::Info,
        (2, _) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

fn effective_scenario(cli: &Cli) -> Result<Scenario> {
    let mut scenario = match &cli.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(seed) = cli.seed {
        scenario.seed = seed;
    }
    if let Some(fps) = cli.fps {
        scenario.fps = fps;
    }
    if let Some(frames) = cli.frames {
        scenario.frames = frames;
    }
    Ok(scenario)
}

fn run(scenario: &Scenario, format: Format) -> Result<()> {
    let mut world = World::new(scenario.world_config()?).context("invalid scenario")?;
    let dt = scenario.frame_duration();
    log::info!(
        "running {} frames at {} fps with seed {:#x}",
        scenario.frames,
        scenario.fps,
        scenario.seed
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Ignite {
            burst: scenario.ignition_burst,
        },
        &mut events,
    );

    for frame in 0..scenario.frames {
        world::apply(&mut world, Command::Tick { dt }, &mut events);
        log_phase_changes(&events);
        let report = FrameReport::capture(frame, &world, std::mem::take(&mut events));
        match format {
            Format::Text => writeln!(out, "{report}")?,
            Format::Json => {
                serde_json::to_writer(&mut out, &report).context("failed to encode frame")?;
                writeln!(out)?;
            }
        }
    }

    out.flush().context("failed to flush frame reports")
}

fn log_phase_changes(events: &[Event]) {
    for event in events {
        if let Event::PhaseChanged(change) = event {
            log::info!(
                "entered {:?} from {:?} at altitude {:.2}",
                change.to,
                change.from,
                change.trigger
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn verbosity_flags_select_log_filter() {
        assert_eq!(log_level(0, false), LevelFilter::Warn);
        assert_eq!(log_level(0, true), LevelFilter::Error);
        assert_eq!(log_level(1, false), LevelFilter::Info);
        assert_eq!(log_level(2, false), LevelFilter::Debug);
        assert_eq!(log_level(3, false), LevelFilter::Trace);
        assert_eq!(log_level(7, false), LevelFilter::Trace);
    }

    #[test]
    fn parsed_flags_map_to_filter() {
        let cli = Cli::try_parse_from(["liftoff", "-vv"]).expect("valid flags");
        assert_eq!(log_level(cli.verbose, cli.quiet), LevelFilter::Debug);

        let cli = Cli::try_parse_from(["liftoff", "--quiet"]).expect("valid flags");
        assert_eq!(log_level(cli.verbose, cli.quiet), LevelFilter::Error);

        assert!(Cli::try_parse_from(["liftoff", "-v", "--quiet"]).is_err());
    }
}
