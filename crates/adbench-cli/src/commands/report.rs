use std::error::Error;
use std::fs;
use std::path::PathBuf;

use adbench_agg::{build_report, export_report_json, AggConfig};
use clap::Args;
use tracing::info;

use super::load_grouped;

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Directory holding one JSON result record per run.
    #[arg(long, default_value = "benchmark/results")]
    pub results: PathBuf,
    /// Destination of the canonical JSON report.
    #[arg(long)]
    pub out: PathBuf,
    /// Leave an existing report untouched.
    #[arg(long)]
    pub skip_existing: bool,
}

pub fn run(args: &ReportArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    if args.skip_existing && args.out.exists() {
        info!(out = %args.out.display(), "report already present; skipping");
        return Ok(());
    }
    let grouped = load_grouped(&args.results, config)?;
    let report = build_report(&args.results, &grouped)?;
    if let Some(parent) = args.out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    export_report_json(&report, &args.out)?;
    println!("{}", report.id);
    Ok(())
}
