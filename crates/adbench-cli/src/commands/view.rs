use std::error::Error;
use std::path::PathBuf;

use adbench_agg::{render_listing, summarize_groups, AggConfig};
use clap::Args;

use super::load_grouped;

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Directory holding one JSON result record per run.
    #[arg(long, default_value = "benchmark/results")]
    pub results: PathBuf,
}

pub fn run(args: &ViewArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    let grouped = load_grouped(&args.results, config)?;
    let summaries = summarize_groups(&grouped)?;
    print!("{}", render_listing(&summaries));
    Ok(())
}
