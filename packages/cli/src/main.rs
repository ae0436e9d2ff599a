//! rmsim CLI
//!
//! ```bash
//! # Text report
//! rmsim input-01.txt
//!
//! # JSON report with per-dispatch logging on stderr
//! rmsim --verbose --json input-01.txt
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use rmsim_engine::adapters::{render_json, render_text};
use rmsim_engine::infrastructure::{load_schedule_file, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// rmsim - opportunistic resource-manager simulator
///
/// Runs an activity schedule against the FIFO manager, breaks deadlocks by
/// aborting the lowest-numbered blocked task and prints per-task wait
/// statistics.
#[derive(Parser, Debug)]
#[command(name = "rmsim", version, about, long_about = None)]
struct Cli {
    /// Log every dispatch and deadlock action to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Print the report as JSON instead of the text table
    #[arg(long)]
    json: bool,

    /// JSON file overriding limits, manager and trace settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resource manager to simulate (fifo)
    #[arg(long, value_name = "NAME")]
    manager: Option<String>,

    /// Activity schedule to simulate
    #[arg(value_name = "INPUT")]
    input: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "rmsim=debug,rmsim_engine=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(name) = &cli.manager {
        config.select_manager(name)?;
    }
    config.validate()?;

    let schedule = load_schedule_file(&cli.input, &config)?;
    info!(
        input = %cli.input.display(),
        tasks = schedule.task_count(),
        resources = schedule.resource_count(),
        groups = schedule.group_count(),
        "schedule loaded"
    );

    let mut simulator = config
        .simulator_builder(schedule)
        .build()
        .context("schedule is inconsistent")?;
    let report = simulator.run().context("simulation failed")?;

    if cli.json {
        let trace = simulator.context().trace();
        let events = trace.is_enabled().then(|| trace.events());
        println!("{}", render_json(&report, events)?);
    } else {
        print!("{}", render_text(&report));
    }

    let dropped = simulator.context().trace().dropped();
    if dropped > 0 {
        info!(dropped, "trace buffer overflowed");
    }

    simulator.reset();
    Ok(())
}
