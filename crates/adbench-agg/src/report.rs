use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use adbench_core::errors::BenchError;
use adbench_core::{ConditionKey, ConditionValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::group::{GroupedResults, ResultGroup};
use crate::hash::stable_hash_string;
use crate::stat::{run_band, summarize, RunBand, Summary};

/// Label used for groups whose condition names no backend.
pub const UNKNOWN_BACKEND: &str = "unknown";

/// Everything a report or plot needs to know about one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Condition key of the group.
    pub key: ConditionKey,
    /// Condition fields shared by every run.
    pub condition: BTreeMap<String, Value>,
    /// Parameter count shared by every run.
    pub num_params: u64,
    /// Number of runs.
    pub runs: usize,
    /// Source file names, in load order, relative to the report source.
    pub files: Vec<String>,
    /// Raw elapsed milliseconds, in load order.
    pub elapsed_ms: Vec<f64>,
    /// Summary of `elapsed_ms`.
    pub elapsed: Summary,
    /// Per-step objective mean and standard deviation across runs.
    ///
    /// Only reduced on request; see [`GroupSummary::with_history`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<RunBand>,
}

impl GroupSummary {
    /// Summarizes the elapsed times of one group. Histories are left untouched.
    pub fn from_group(group: &ResultGroup) -> Result<Self, BenchError> {
        if !group.num_params_consistent() {
            warn!(
                key = %group.key(),
                num_params = group.num_params(),
                "runs of one condition disagree on numParams; using the first"
            );
        }
        let elapsed_ms = group.elapsed();
        let elapsed = summarize(&elapsed_ms)
            .map_err(|err| err.with_context("group", group.key().to_string()))?;
        Ok(Self {
            key: group.key().clone(),
            condition: group.condition().clone(),
            num_params: group.num_params(),
            runs: group.len(),
            files: group
                .records()
                .iter()
                .map(|loaded| file_name(&loaded.path))
                .collect(),
            elapsed_ms,
            elapsed,
            history: None,
        })
    }

    /// Adds the history band of `group`. Histories of unequal length abort
    /// with `RaggedInput` naming the offending file.
    pub fn with_history(mut self, group: &ResultGroup) -> Result<Self, BenchError> {
        let histories = group.histories();
        let history = run_band(&histories).map_err(|err| {
            let offender = err
                .info()
                .context
                .get("run")
                .and_then(|idx| idx.parse::<usize>().ok())
                .and_then(|idx| group.records().get(idx));
            let err = err.with_context("group", group.key().to_string());
            match offender {
                Some(loaded) => err.at_path(&loaded.path),
                None => err,
            }
        })?;
        self.history = Some(history);
        Ok(self)
    }

    /// Backend named in the condition, rendered as text.
    pub fn backend(&self) -> String {
        self.condition
            .get("adBackend")
            .and_then(ConditionValue::from_json)
            .map(|value| value.to_string())
            .unwrap_or_else(|| UNKNOWN_BACKEND.to_string())
    }
}

/// One point of the parameters-versus-time curve of a backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingPoint {
    /// Model parameter count.
    pub num_params: u64,
    /// Mean elapsed time in seconds.
    pub mean_elapsed_secs: f64,
}

/// Groups condition summaries by backend, each curve sorted by parameter count then time.
pub fn scaling_series(summaries: &[GroupSummary]) -> BTreeMap<String, Vec<ScalingPoint>> {
    let mut series: BTreeMap<String, Vec<ScalingPoint>> = BTreeMap::new();
    for summary in summaries {
        series.entry(summary.backend()).or_default().push(ScalingPoint {
            num_params: summary.num_params,
            mean_elapsed_secs: summary.elapsed.mean / 1000.0,
        });
    }
    for points in series.values_mut() {
        points.sort_by(|a, b| {
            a.num_params
                .cmp(&b.num_params)
                .then(a.mean_elapsed_secs.total_cmp(&b.mean_elapsed_secs))
        });
    }
    series
}

/// Deterministic report over one results directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Stable hash over `groups` and `scaling`; independent of where the
    /// results directory lives.
    pub id: String,
    /// Directory the records were loaded from.
    pub source: String,
    /// Number of records aggregated.
    pub records: usize,
    /// Condition summaries in key order.
    pub groups: Vec<GroupSummary>,
    /// Parameters-versus-time curves keyed by backend.
    pub scaling: BTreeMap<String, Vec<ScalingPoint>>,
}

/// Summarizes the elapsed times of every group of `grouped`, in key order.
pub fn summarize_groups(grouped: &GroupedResults) -> Result<Vec<GroupSummary>, BenchError> {
    grouped.groups().map(GroupSummary::from_group).collect()
}

/// Like [`summarize_groups`], with every group's history band included.
pub fn summarize_groups_with_histories(
    grouped: &GroupedResults,
) -> Result<Vec<GroupSummary>, BenchError> {
    grouped
        .groups()
        .map(|group| GroupSummary::from_group(group)?.with_history(group))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Builds the report for records loaded from `source`.
pub fn build_report(source: &Path, grouped: &GroupedResults) -> Result<SessionReport, BenchError> {
    let groups = summarize_groups_with_histories(grouped)?;
    let scaling = scaling_series(&groups);
    let id = stable_hash_string(&(&groups, &scaling))?;
    info!(
        source = %source.display(),
        records = grouped.total_records(),
        groups = groups.len(),
        "built session report"
    );
    Ok(SessionReport {
        id,
        source: source.display().to_string(),
        records: grouped.total_records(),
        groups,
        scaling,
    })
}

/// Renders the plain-text per-condition listing.
///
/// Each group prints a separator, its condition, the mean runtime and the raw
/// elapsed values.
pub fn render_listing(summaries: &[GroupSummary]) -> String {
    let mut out = String::new();
    for summary in summaries {
        let condition = serde_json::to_string(&summary.condition).unwrap_or_default();
        let _ = writeln!(out, "------------------------------");
        let _ = writeln!(out, "{condition}");
        let _ = writeln!(out, "mean runtime (ms): {:?}", summary.elapsed.mean);
        let _ = writeln!(out, "  {:?}", summary.elapsed_ms);
    }
    out
}
