use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use adbench_core::errors::{BenchError, ErrorInfo};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::loader::{matching_files, read_json};
use crate::stat::{run_band, summarize, thin, RunBand, Summary};

fn pattern_error(code: &str, pattern: &str, message: impl Into<String>) -> BenchError {
    BenchError::Config(ErrorInfo::new(code, message).with_context("pattern", pattern))
}

/// Structured condition recovered from a run-series file name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunKey(BTreeMap<String, String>);

impl RunKey {
    /// Creates an empty key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `field` to `value`, returning the key for chaining.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Returns the value recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Returns a copy of the key without `field`.
    pub fn without(&self, field: &str) -> Self {
        let mut fields = self.0.clone();
        fields.remove(field);
        Self(fields)
    }

    /// Iterates `(field, value)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Display for RunKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (field, value)) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(String),
}

/// File-name pattern such as `cubo-{guide}-n-{n}-length-{length}-{run}`.
///
/// Literal text must match exactly and every `{field}` captures a non-empty
/// value. When more than one split fits, earlier fields take the longest
/// value, so `{config}_{stamp}` splits at the last underscore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPattern {
    source: String,
    segments: Vec<Segment>,
}

impl RunPattern {
    /// Parses and validates a pattern.
    pub fn parse(text: &str) -> Result<Self, BenchError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut seen = BTreeSet::new();
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        match inner {
                            '}' => {
                                closed = true;
                                break;
                            }
                            c if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                            c => {
                                return Err(pattern_error(
                                    "pattern_field_name",
                                    text,
                                    format!("invalid character {c:?} in field name"),
                                ))
                            }
                        }
                    }
                    if !closed {
                        return Err(pattern_error("pattern_unclosed", text, "unclosed '{'"));
                    }
                    if name.is_empty() {
                        return Err(pattern_error("pattern_field_name", text, "empty field name"));
                    }
                    if !seen.insert(name.clone()) {
                        return Err(pattern_error(
                            "pattern_duplicate_field",
                            text,
                            format!("field {name} appears twice"),
                        )
                        .with_context("field", name));
                    }
                    if literal.is_empty() {
                        if let Some(Segment::Field(_)) = segments.last() {
                            return Err(pattern_error(
                                "pattern_adjacent_fields",
                                text,
                                "fields must be separated by literal text",
                            ));
                        }
                    } else {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => {
                    return Err(pattern_error("pattern_unopened", text, "unmatched '}'"));
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        if seen.is_empty() {
            return Err(pattern_error(
                "pattern_without_fields",
                text,
                "pattern must contain at least one {field}",
            ));
        }
        Ok(Self {
            source: text.to_string(),
            segments,
        })
    }

    /// Original pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Field names in pattern order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns `true` when the pattern captures `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|name| name == field)
    }

    /// Recovers the key encoded in `stem`, or `None` if the stem does not fit.
    pub fn match_stem(&self, stem: &str) -> Option<RunKey> {
        let mut fields = BTreeMap::new();
        if match_segments(&self.segments, stem, &mut fields) {
            Some(RunKey(fields))
        } else {
            None
        }
    }

    /// Renders the file stem for `key`.
    pub fn render(&self, key: &RunKey) -> Result<String, BenchError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value = key.get(name).ok_or_else(|| {
                        pattern_error(
                            "pattern_missing_field",
                            &self.source,
                            format!("key has no value for {name}"),
                        )
                        .with_context("field", name.clone())
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn match_segments(segments: &[Segment], text: &str, fields: &mut BTreeMap<String, String>) -> bool {
    match segments.split_first() {
        None => text.is_empty(),
        Some((Segment::Literal(literal), rest)) => match text.strip_prefix(literal.as_str()) {
            Some(remaining) => match_segments(rest, remaining, fields),
            None => false,
        },
        Some((Segment::Field(name), rest)) => {
            let Some((Segment::Literal(next), _)) = rest.split_first() else {
                if text.is_empty() {
                    return false;
                }
                fields.insert(name.clone(), text.to_string());
                return true;
            };
            for end in (1..text.len()).rev() {
                if !text.is_char_boundary(end) || !text[end..].starts_with(next.as_str()) {
                    continue;
                }
                fields.insert(name.clone(), text[..end].to_string());
                if match_segments(rest, &text[end..], fields) {
                    return true;
                }
                fields.remove(name);
            }
            false
        }
    }
}

/// One run-series file: its key, its source and its (thinned) values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSeries {
    /// Key recovered from the file name.
    pub key: RunKey,
    /// Source file.
    pub path: PathBuf,
    /// Series values after thinning.
    pub values: Vec<f64>,
}

impl AsRef<[f64]> for RunSeries {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

fn read_series(path: &Path, key: RunKey, stride: NonZeroUsize) -> Result<RunSeries, BenchError> {
    let raw: Vec<f64> = read_json(path)?;
    Ok(RunSeries {
        key,
        path: path.to_path_buf(),
        values: thin(&raw, stride),
    })
}

/// Loads every `*.json` file in `dir` whose stem matches `pattern`, in file-name order.
///
/// Files whose stem does not fit the pattern are skipped.
pub fn load_run_series(
    dir: &Path,
    pattern: &RunPattern,
    stride: NonZeroUsize,
) -> Result<Vec<RunSeries>, BenchError> {
    let mut series = Vec::new();
    for path in matching_files(dir, "*.json")? {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let Some(key) = pattern.match_stem(stem) else {
            debug!(path = %path.display(), pattern = pattern.as_str(), "skipping non-matching file");
            continue;
        };
        series.push(read_series(&path, key, stride)?);
    }
    Ok(series)
}

/// Loads the single run named by `key`. A missing file yields `Ok(None)`.
pub fn load_run(
    dir: &Path,
    pattern: &RunPattern,
    key: &RunKey,
    stride: NonZeroUsize,
) -> Result<Option<RunSeries>, BenchError> {
    let path = dir.join(format!("{}.json", pattern.render(key)?));
    if !path.is_file() {
        warn!(path = %path.display(), "missing run file");
        return Ok(None);
    }
    read_series(&path, key.clone(), stride).map(Some)
}

/// Groups runs by their key with `run_field` removed.
pub fn group_runs(
    series: Vec<RunSeries>,
    run_field: &str,
) -> Result<BTreeMap<RunKey, Vec<RunSeries>>, BenchError> {
    let mut groups: BTreeMap<RunKey, Vec<RunSeries>> = BTreeMap::new();
    for run in series {
        if run.key.get(run_field).is_none() {
            return Err(BenchError::Config(
                ErrorInfo::new(
                    "run_field_missing",
                    format!("run key {} has no {run_field} field", run.key),
                )
                .with_path(&run.path)
                .with_context("field", run_field),
            ));
        }
        groups.entry(run.key.without(run_field)).or_default().push(run);
    }
    Ok(groups)
}

/// Mean band and final-value summary for one group of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunGroupReport {
    /// Group key (run field removed).
    pub key: RunKey,
    /// Source files, in load order.
    pub files: Vec<String>,
    /// Summary of the last value of every run; `None` when the runs hold no values.
    pub last: Option<Summary>,
    /// Per-step mean and standard deviation envelope.
    pub band: RunBand,
}

/// Builds a [`RunGroupReport`] for every group.
///
/// Unequal run lengths inside a group abort with `RaggedInput`, naming the
/// group and the offending file.
pub fn run_group_reports(
    groups: &BTreeMap<RunKey, Vec<RunSeries>>,
) -> Result<Vec<RunGroupReport>, BenchError> {
    let mut reports = Vec::with_capacity(groups.len());
    for (key, runs) in groups {
        let band = run_band(runs).map_err(|err| {
            let offender = err
                .info()
                .context
                .get("run")
                .and_then(|idx| idx.parse::<usize>().ok())
                .and_then(|idx| runs.get(idx));
            let err = err.with_context("group", key.to_string());
            match offender {
                Some(run) => err.at_path(&run.path),
                None => err,
            }
        })?;
        let lasts: Vec<f64> = runs
            .iter()
            .filter_map(|run| run.values.last().copied())
            .collect();
        // Runs in a group share one length, so either every run has a last value or none does.
        let last = if lasts.is_empty() {
            None
        } else {
            Some(summarize(&lasts).map_err(|err| err.with_context("group", key.to_string()))?)
        };
        reports.push(RunGroupReport {
            key: key.clone(),
            files: runs
                .iter()
                .map(|run| run.path.display().to_string())
                .collect(),
            last,
            band,
        });
    }
    Ok(reports)
}

/// Loads, groups and reduces a run-series directory in one call.
pub fn summarize_runs(
    dir: &Path,
    pattern: &RunPattern,
    run_field: &str,
    stride: NonZeroUsize,
) -> Result<Vec<RunGroupReport>, BenchError> {
    if !pattern.has_field(run_field) {
        return Err(pattern_error(
            "run_field_missing",
            pattern.as_str(),
            format!("pattern does not capture {run_field}"),
        )
        .with_context("field", run_field));
    }
    let series = load_run_series(dir, pattern, stride)?;
    let groups = group_runs(series, run_field)?;
    run_group_reports(&groups)
}
