//! Binary entry point for graphseries.
//!
//! Parses the command line, initializes logging, and prints command
//! results.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr/print_stdout in the binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use graphseries::cli::{cmd_reset, cmd_run, cmd_stats};
use graphseries::config::{BenchConfig, ConfigFile};
use graphseries::models::{BenchmarkReport, WriteStrategy};
use graphseries::observability::{self, LogFormat, LoggingConfig};
use graphseries::storage::{InMemoryStore, StoreBackend};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Graphseries - a benchmark for sensor time-series modeling strategies.
#[derive(Parser)]
#[command(name = "graphseries")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as line-delimited JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long, global = true, env = "GRAPHSERIES_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Execute a timed benchmark run.
    Run {
        /// Persistence strategy to exercise.
        #[arg(short, long, value_enum)]
        strategy: Option<WriteStrategy>,

        /// Number of sensors to seed.
        #[arg(long)]
        sensors: Option<u64>,

        /// Records written per sensor.
        #[arg(long)]
        records: Option<usize>,

        /// Outgoing AFFECTS edges per sensor.
        #[arg(long)]
        out_degree: Option<usize>,

        /// RNG seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Skip failed writes instead of aborting.
        #[arg(long)]
        continue_on_error: bool,
    },

    /// Remove all benchmark data, keeping the schema.
    Reset,

    /// Count stored elements per type.
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        format: if cli.json_logs { LogFormat::Json } else { LogFormat::Pretty },
        verbose: cli.verbose,
    };
    if let Err(e) = observability::init(logging) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let store: Arc<dyn StoreBackend> = Arc::new(InMemoryStore::new());

    match &cli.command {
        Commands::Run {
            strategy,
            sensors,
            records,
            out_degree,
            seed,
            continue_on_error,
        } => {
            let mut config = base_config(cli.config.as_deref())?;
            if let Some(strategy) = strategy {
                config.strategy = *strategy;
            }
            if let Some(sensors) = sensors {
                config.num_sensors = *sensors;
            }
            if let Some(records) = records {
                config.records_per_sensor = *records;
            }
            if let Some(out_degree) = out_degree {
                config.out_degree = *out_degree;
            }
            if let Some(seed) = seed {
                config.seed = Some(*seed);
            }
            if *continue_on_error {
                config.continue_on_error = true;
            }

            let report = cmd_run(store, config)?;
            print_report(&report);
        },
        Commands::Reset => {
            let removed = cmd_reset(store)?;
            println!("removed {removed} elements");
        },
        Commands::Stats => {
            let stats = cmd_stats(store)?;
            for (type_name, count) in &stats.counts {
                println!("{type_name:<10} {count}");
            }
            println!("{:<10} {}", "total", stats.total());
        },
    }
    Ok(())
}

fn base_config(path: Option<&std::path::Path>) -> anyhow::Result<BenchConfig> {
    let mut config = BenchConfig::default();
    if let Some(path) = path {
        ConfigFile::load(path)?.apply(&mut config);
    }
    Ok(config)
}

fn print_report(report: &BenchmarkReport) {
    println!("strategy: {}", report.strategy);
    println!();
    println!("{:<10} {:>10} {:>10} {:>12} {:>12}", "sensor", "records", "skipped", "elapsed", "rec/s");
    for timing in &report.timings {
        println!(
            "{:<10} {:>10} {:>10} {:>10.3}ms {:>12.0}",
            timing.sensor_id,
            timing.records,
            timing.skipped,
            timing.elapsed.as_secs_f64() * 1_000.0,
            timing.throughput(),
        );
    }
    println!();
    println!(
        "total: {} records ({} skipped) in {:.3}ms, {} edges",
        report.total_records(),
        report.total_skipped(),
        report.total_elapsed().as_secs_f64() * 1_000.0,
        report.edges_created,
    );
    println!(
        "sentinel: sensor {} position {}",
        report.sentinel_sensor, report.sentinel_position
    );
}
