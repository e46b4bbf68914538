use std::fs;
use std::path::{Path, PathBuf};

use adbench_core::errors::{BenchError, ErrorInfo};
use adbench_core::ResultRecord;
use globset::{Glob, GlobMatcher};
use serde::de::DeserializeOwned;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::ResultsConfig;
use crate::serde::from_json_slice;

/// Options controlling which files of a directory are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Glob matched against each file name (not the full path).
    pub pattern: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            pattern: "*.json".to_string(),
        }
    }
}

impl From<&ResultsConfig> for LoaderOptions {
    fn from(config: &ResultsConfig) -> Self {
        Self {
            pattern: config.pattern.clone(),
        }
    }
}

/// A decoded result record together with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecord {
    /// Source file.
    pub path: PathBuf,
    /// Decoded record.
    pub record: ResultRecord,
}

fn build_matcher(pattern: &str) -> Result<GlobMatcher, BenchError> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("glob", err.to_string()).with_context("pattern", pattern),
            )
        })
}

/// Lists the files directly inside `dir` whose name matches `pattern`, in file-name order.
pub fn matching_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, BenchError> {
    if !dir.exists() {
        return Err(BenchError::not_found("results_dir", dir));
    }
    if !dir.is_dir() {
        return Err(BenchError::NotFound(
            ErrorInfo::new("results_dir", format!("{} is not a directory", dir.display()))
                .with_path(dir)
                .with_hint("pass the directory holding the JSON result files"),
        ));
    }
    let matcher = build_matcher(pattern)?;
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            BenchError::Io(ErrorInfo::new("results_walk", err.to_string()).with_path(&path))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if matcher.is_match(entry.file_name()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Reads and decodes one JSON document.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BenchError> {
    let bytes = fs::read(path).map_err(|err| BenchError::from_io("json_read", path, &err))?;
    from_json_slice(path, &bytes)
}

/// Decodes every result record in `dir` matching the loader pattern.
///
/// Any unreadable or malformed file aborts the whole load.
pub fn load_results_with(
    dir: &Path,
    opts: &LoaderOptions,
) -> Result<Vec<LoadedRecord>, BenchError> {
    let files = matching_files(dir, &opts.pattern)?;
    let mut records = Vec::with_capacity(files.len());
    for path in files {
        let record: ResultRecord = read_json(&path)?;
        debug!(path = %path.display(), elapsed = record.elapsed, "loaded result record");
        records.push(LoadedRecord { path, record });
    }
    Ok(records)
}

/// Decodes every `*.json` result record in `dir`.
pub fn load_results(dir: &Path) -> Result<Vec<LoadedRecord>, BenchError> {
    load_results_with(dir, &LoaderOptions::default())
}
