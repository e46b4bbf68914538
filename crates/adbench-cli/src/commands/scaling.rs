use std::error::Error;
use std::path::PathBuf;

use adbench_agg::serde::to_canonical_json_pretty;
use adbench_agg::{export_scaling_csv, scaling_series, summarize_groups, AggConfig};
use clap::Args;
use tracing::info;

use super::load_grouped;

#[derive(Args, Debug)]
pub struct ScalingArgs {
    /// Directory holding one JSON result record per run.
    #[arg(long, default_value = "benchmark/results")]
    pub results: PathBuf,
    /// Write `backend,num_params,mean_elapsed_secs` rows here instead of printing JSON.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

pub fn run(args: &ScalingArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    let grouped = load_grouped(&args.results, config)?;
    let scaling = scaling_series(&summarize_groups(&grouped)?);
    match &args.csv {
        Some(out) => {
            export_scaling_csv(&scaling, out)?;
            info!(out = %out.display(), backends = scaling.len(), "wrote scaling table");
        }
        None => println!("{}", to_canonical_json_pretty(&scaling)?),
    }
    Ok(())
}
