use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use adbench_core::errors::{BenchError, ErrorInfo};
use adbench_core::ResultRecord;
use tempfile::Builder;
use tracing::info;

use crate::schema::ConditionSchema;
use crate::serde::to_canonical_json_bytes;

/// Persists `record` as `<stamp_ms>.json` inside `dir`.
///
/// The record's condition is validated against `schema` first, and an
/// existing file is never overwritten. The record only appears under its
/// final name once fully written.
pub fn write_record(
    dir: &Path,
    record: &ResultRecord,
    stamp_ms: i64,
    schema: &ConditionSchema,
) -> Result<PathBuf, BenchError> {
    let key = schema.key_of(record)?;
    fs::create_dir_all(dir).map_err(|err| BenchError::from_io("record_dir", dir, &err))?;
    let path = dir.join(format!("{stamp_ms}.json"));
    let bytes = to_canonical_json_bytes(record)?;
    // The staged file never matches a results glob and is removed when dropped.
    let mut staged = Builder::new()
        .prefix(".record-")
        .suffix(".partial")
        .tempfile_in(dir)
        .map_err(|err| BenchError::from_io("record_write", dir, &err))?;
    staged
        .write_all(&bytes)
        .map_err(|err| BenchError::from_io("record_write", &path, &err))?;
    staged
        .as_file()
        .sync_all()
        .map_err(|err| BenchError::from_io("record_write", &path, &err))?;
    staged.persist_noclobber(&path).map_err(|err| {
        if err.error.kind() == ErrorKind::AlreadyExists {
            BenchError::Io(
                ErrorInfo::new("record_exists", format!("{} already exists", path.display()))
                    .with_path(&path)
                    .with_hint("records are immutable; retry with a later timestamp"),
            )
        } else {
            BenchError::from_io("record_write", &path, &err.error)
        }
    })?;
    info!(path = %path.display(), key = %key, "stored result record");
    Ok(path)
}
