use std::error::Error;
use std::path::PathBuf;

use adbench_agg::loader::read_json;
use adbench_agg::{write_record, AggConfig};
use adbench_core::ResultRecord;
use chrono::Utc;
use clap::Args;

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// Directory receiving `<unix millis>.json`.
    #[arg(long, default_value = "benchmark/results")]
    pub results: PathBuf,
    /// Result record to validate and store.
    #[arg(long)]
    pub input: PathBuf,
}

pub fn run(args: &RecordArgs, config: &AggConfig) -> Result<(), Box<dyn Error>> {
    let record: ResultRecord = read_json(&args.input)?;
    let stamp_ms = Utc::now().timestamp_millis();
    let path = write_record(&args.results, &record, stamp_ms, &config.condition_fields)?;
    println!("{}", path.display());
    Ok(())
}
