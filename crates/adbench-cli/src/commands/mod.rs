pub mod config;
pub mod histories;
pub mod record;
pub mod report;
pub mod runs;
pub mod scaling;
pub mod view;

use std::path::Path;

use adbench_agg::{group_results_with, load_results_with, AggConfig, GroupedResults, LoaderOptions};
use adbench_core::BenchError;
use tracing::info;

/// Loads and groups a results directory according to `config`.
pub fn load_grouped(results: &Path, config: &AggConfig) -> Result<GroupedResults, BenchError> {
    let records = load_results_with(results, &LoaderOptions::from(&config.results))?;
    let grouped = group_results_with(records, &config.condition_fields)?;
    info!(
        results = %results.display(),
        records = grouped.total_records(),
        groups = grouped.len(),
        "grouped results"
    );
    Ok(grouped)
}
