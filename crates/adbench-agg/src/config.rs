use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;

use adbench_core::errors::{BenchError, ErrorInfo};
use serde::{Deserialize, Serialize};

use crate::runs::RunPattern;
use crate::schema::ConditionSchema;
use crate::serde::from_yaml_slice;

fn config_error(code: &str, message: impl Into<String>) -> BenchError {
    BenchError::Config(ErrorInfo::new(code, message))
}

/// Loader settings for result record directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultsConfig {
    /// Glob matched against file names inside the results directory.
    #[serde(default = "ResultsConfig::default_pattern")]
    pub pattern: String,
}

impl ResultsConfig {
    fn default_pattern() -> String {
        "*.json".to_string()
    }
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            pattern: Self::default_pattern(),
        }
    }
}

/// Settings for run-series directories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunsConfig {
    /// Name pattern used to recover the structured key from each file stem.
    #[serde(default = "RunsConfig::default_pattern")]
    pub pattern: String,
    /// Key field distinguishing repeated runs of the same condition.
    #[serde(default = "RunsConfig::default_run_field")]
    pub run_field: String,
    /// Keep every `stride`-th value of each series.
    #[serde(default = "RunsConfig::default_stride")]
    pub stride: NonZeroUsize,
}

impl RunsConfig {
    fn default_pattern() -> String {
        "{guide}-{length}-{run}".to_string()
    }

    fn default_run_field() -> String {
        "run".to_string()
    }

    fn default_stride() -> NonZeroUsize {
        NonZeroUsize::MIN
    }
}

impl Default for RunsConfig {
    fn default() -> Self {
        Self {
            pattern: Self::default_pattern(),
            run_field: Self::default_run_field(),
            stride: Self::default_stride(),
        }
    }
}

/// Top-level aggregation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AggConfig {
    /// Result directory loader settings.
    #[serde(default)]
    pub results: ResultsConfig,
    /// Ordered condition fields forming the grouping key.
    #[serde(default)]
    pub condition_fields: ConditionSchema,
    /// Run-series loader settings.
    #[serde(default)]
    pub runs: RunsConfig,
}

impl AggConfig {
    /// Checks invariants serde cannot express.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.results.pattern.trim().is_empty() {
            return Err(config_error("empty_results_pattern", "results.pattern is empty"));
        }
        if self.runs.run_field.is_empty() {
            return Err(config_error("empty_run_field", "runs.run_field is empty"));
        }
        let pattern = RunPattern::parse(&self.runs.pattern)?;
        if !pattern.has_field(&self.runs.run_field) {
            return Err(config_error(
                "run_field_missing",
                format!(
                    "runs.pattern {} does not capture {}",
                    self.runs.pattern, self.runs.run_field
                ),
            ));
        }
        Ok(())
    }
}

/// Loads and validates a YAML configuration file.
pub fn load_config(path: &Path) -> Result<AggConfig, BenchError> {
    let bytes = fs::read(path).map_err(|err| BenchError::from_io("config_read", path, &err))?;
    let config: AggConfig = from_yaml_slice(&bytes).map_err(|err| err.at_path(path))?;
    config.validate().map_err(|err| err.at_path(path))?;
    Ok(config)
}
