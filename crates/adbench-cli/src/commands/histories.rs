use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use adbench_agg::serde::to_canonical_json_pretty;
use adbench_agg::{summarize_runs, AggConfig, RunPattern};
use clap::Args;

const HISTORY_PATTERN: &str = "{config}_{timestamp}";
const HISTORY_RUN_FIELD: &str = "timestamp";

#[derive(Args, Debug)]
pub struct HistoriesArgs {
    /// Directory of `<config>_<timestamp>.json` objective histories.
    #[arg(long)]
    pub dir: PathBuf,
    /// Keep every n-th value of each history; defaults to `runs.stride`.
    #[arg(long)]
    pub stride: Option<NonZeroUsize>,
}

pub fn run(args: &HistoriesArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    let pattern = RunPattern::parse(HISTORY_PATTERN)?;
    let stride = args.stride.unwrap_or(config.runs.stride);
    let reports = summarize_runs(&args.dir, &pattern, HISTORY_RUN_FIELD, stride)?;
    println!("{}", to_canonical_json_pretty(&reports)?);
    Ok(())
}
