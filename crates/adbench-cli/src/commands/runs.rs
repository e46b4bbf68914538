use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use adbench_agg::serde::to_canonical_json_pretty;
use adbench_agg::{summarize_runs, AggConfig, RunPattern};
use clap::Args;
use tracing::info;

#[derive(Args, Debug)]
pub struct RunsArgs {
    /// Directory holding one JSON array of values per run.
    #[arg(long)]
    pub dir: PathBuf,
    /// File-name pattern such as `{guide}-n-{n}-{run}`; defaults to `runs.pattern`.
    #[arg(long)]
    pub pattern: Option<String>,
    /// Field separating repeated runs; defaults to `runs.run_field`.
    #[arg(long)]
    pub run_field: Option<String>,
    /// Keep every n-th value of each series; defaults to `runs.stride`.
    #[arg(long)]
    pub stride: Option<NonZeroUsize>,
}

pub fn run(args: &RunsArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    let pattern = RunPattern::parse(args.pattern.as_deref().unwrap_or(&config.runs.pattern))?;
    let run_field = args.run_field.as_deref().unwrap_or(&config.runs.run_field);
    let stride = args.stride.unwrap_or(config.runs.stride);
    let reports = summarize_runs(&args.dir, &pattern, run_field, stride)?;
    info!(
        dir = %args.dir.display(),
        pattern = pattern.as_str(),
        groups = reports.len(),
        "summarized runs"
    );
    println!("{}", to_canonical_json_pretty(&reports)?);
    Ok(())
}
