use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use adbench_agg::{load_config, AggConfig};
use clap::{ArgAction, Parser, Subcommand};
use commands::{
    config::{self as show_config, ConfigArgs},
    histories::{self, HistoriesArgs},
    record::{self, RecordArgs},
    report::{self, ReportArgs},
    runs::{self, RunsArgs},
    scaling::{self, ScalingArgs},
    view::{self, ViewArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "adbench",
    version,
    about = "Aggregate recorded autodiff benchmark results"
)]
struct Cli {
    /// YAML configuration overriding loader and run-pattern defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every condition with its mean runtime and raw timings.
    View(ViewArgs),
    /// Emit the parameters-versus-time curve of each backend.
    Scaling(ScalingArgs),
    /// Write the full canonical JSON report for a results directory.
    Report(ReportArgs),
    /// Reduce run-series files to per-condition mean and deviation bands.
    Runs(RunsArgs),
    /// Group `<config>_<timestamp>.json` objective histories by config.
    Histories(HistoriesArgs),
    /// Validate a result record and store it under a timestamped name.
    Record(RecordArgs),
    /// Print the effective configuration as YAML.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AggConfig::default(),
    };
    match cli.command {
        Command::View(args) => view::run(&args, &config),
        Command::Scaling(args) => scaling::run(&args, &config),
        Command::Report(args) => report::run(&args, &config),
        Command::Runs(args) => runs::run(&args, &config),
        Command::Histories(args) => histories::run(&args, &config),
        Command::Record(args) => record::run(&args, &config),
        Command::Config(args) => show_config::run(&args, &config),
    }
}
