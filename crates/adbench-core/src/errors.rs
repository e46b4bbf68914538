//! Structured error types shared across adbench crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`BenchError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, positions, lengths, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Records the offending file path under the `path` context key.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

/// Canonical error type for result aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BenchError {
    /// A directory or file that must exist is missing.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// A file does not contain well-formed JSON.
    #[error("decode error: {0}")]
    Decode(ErrorInfo),
    /// A document is valid JSON but does not have the expected shape.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// A statistic was requested over zero elements.
    #[error("empty input: {0}")]
    EmptyInput(ErrorInfo),
    /// An element-wise reduction was requested over series of unequal length.
    #[error("ragged input: {0}")]
    RaggedInput(ErrorInfo),
    /// Filesystem failures other than a missing path.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Invalid configuration, glob or run name pattern.
    #[error("config error: {0}")]
    Config(ErrorInfo),
}

/// Discriminant of a [`BenchError`], convenient for matching without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`BenchError::NotFound`].
    NotFound,
    /// See [`BenchError::Decode`].
    Decode,
    /// See [`BenchError::Schema`].
    Schema,
    /// See [`BenchError::EmptyInput`].
    EmptyInput,
    /// See [`BenchError::RaggedInput`].
    RaggedInput,
    /// See [`BenchError::Io`].
    Io,
    /// See [`BenchError::Config`].
    Config,
}

impl BenchError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BenchError::NotFound(info)
            | BenchError::Decode(info)
            | BenchError::Schema(info)
            | BenchError::EmptyInput(info)
            | BenchError::RaggedInput(info)
            | BenchError::Io(info)
            | BenchError::Config(info) => info,
        }
    }

    /// Returns the variant discriminant.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BenchError::NotFound(_) => ErrorKind::NotFound,
            BenchError::Decode(_) => ErrorKind::Decode,
            BenchError::Schema(_) => ErrorKind::Schema,
            BenchError::EmptyInput(_) => ErrorKind::EmptyInput,
            BenchError::RaggedInput(_) => ErrorKind::RaggedInput,
            BenchError::Io(_) => ErrorKind::Io,
            BenchError::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the offending path when one was recorded.
    pub fn path(&self) -> Option<&str> {
        self.info().context.get("path").map(String::as_str)
    }

    /// Attaches the offending path to an error raised without one.
    pub fn at_path(self, path: &Path) -> Self {
        self.map_info(|info| info.with_path(path))
    }

    /// Adds a context entry without changing the variant.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            BenchError::NotFound(info) => BenchError::NotFound(f(info)),
            BenchError::Decode(info) => BenchError::Decode(f(info)),
            BenchError::Schema(info) => BenchError::Schema(f(info)),
            BenchError::EmptyInput(info) => BenchError::EmptyInput(f(info)),
            BenchError::RaggedInput(info) => BenchError::RaggedInput(f(info)),
            BenchError::Io(info) => BenchError::Io(f(info)),
            BenchError::Config(info) => BenchError::Config(f(info)),
        }
    }

    /// Error raised when a reducer receives no elements.
    pub fn empty_input(operation: &str) -> Self {
        BenchError::EmptyInput(
            ErrorInfo::new("empty_input", format!("{operation} requires at least one value"))
                .with_context("operation", operation),
        )
    }

    /// Error raised when run `run` has `actual` elements instead of `expected`.
    pub fn ragged(run: usize, expected: usize, actual: usize) -> Self {
        BenchError::RaggedInput(
            ErrorInfo::new(
                "ragged_runs",
                format!("run {run} has {actual} values, expected {expected}"),
            )
            .with_context("run", run.to_string())
            .with_context("expected", expected.to_string())
            .with_context("actual", actual.to_string()),
        )
    }

    /// Error raised for a path that does not exist.
    pub fn not_found(code: &str, path: &Path) -> Self {
        BenchError::NotFound(
            ErrorInfo::new(code, format!("{} does not exist", path.display())).with_path(path),
        )
    }

    /// Maps an I/O failure on `path`, promoting missing files to [`BenchError::NotFound`].
    pub fn from_io(code: &str, path: &Path, err: &io::Error) -> Self {
        let info = ErrorInfo::new(code, format!("{}: {err}", path.display())).with_path(path);
        if err.kind() == io::ErrorKind::NotFound {
            BenchError::NotFound(info)
        } else {
            BenchError::Io(info)
        }
    }

    /// Maps a JSON failure on `path`.
    ///
    /// Syntax and truncation errors become [`BenchError::Decode`]; well-formed
    /// documents of the wrong shape become [`BenchError::Schema`]. Both carry the
    /// line and column reported by the parser.
    pub fn from_json(path: &Path, err: &serde_json::Error) -> Self {
        use serde_json::error::Category;

        let (code, wrap): (&str, fn(ErrorInfo) -> BenchError) = match err.classify() {
            Category::Syntax | Category::Eof => ("json_decode", BenchError::Decode),
            Category::Data => ("json_shape", BenchError::Schema),
            Category::Io => ("json_read", BenchError::Io),
        };
        wrap(
            ErrorInfo::new(code, err.to_string())
                .with_path(path)
                .with_context("line", err.line().to_string())
                .with_context("column", err.column().to_string()),
        )
    }
}
