#![deny(missing_docs)]
#![doc = "Loading, keying, grouping and summarizing recorded benchmark results."]

/// YAML configuration for loaders and run patterns.
pub mod config;
/// Report and table exporters.
pub mod export;
/// Grouping of records by condition key.
pub mod group;
/// Canonical hashing helpers.
pub mod hash;
/// Result directory loading.
pub mod loader;
/// Per-condition summaries and session reports.
pub mod report;
/// Run-series files keyed by structured name patterns.
pub mod runs;
/// Condition key extraction.
pub mod schema;
/// Canonical JSON serde helpers.
pub mod serde;
/// Summary statistics.
pub mod stat;
/// Result record persistence.
pub mod store;

pub use config::{load_config, AggConfig, ResultsConfig, RunsConfig};
pub use export::{export_report_json, export_scaling_csv, write_scaling_csv};
pub use group::{group_results, group_results_with, GroupedResults, ResultGroup};
pub use loader::{load_results, load_results_with, LoadedRecord, LoaderOptions};
pub use report::{
    build_report, render_listing, scaling_series, summarize_groups, summarize_groups_with_histories,
    GroupSummary, ScalingPoint, SessionReport,
};
pub use runs::{
    group_runs, load_run, load_run_series, run_group_reports, summarize_runs, RunGroupReport,
    RunKey, RunPattern, RunSeries,
};
pub use schema::{condition_key, ConditionSchema, DEFAULT_CONDITION_FIELDS};
pub use stat::{
    mean, mean_and_sd_of_runs, run_band, standard_deviation, summarize, thin, thinned, variance,
    RunBand, Summary,
};
pub use store::write_record;
