use std::collections::BTreeMap;
use std::iter::FromIterator;
use std::path::Path;

use adbench_core::errors::{BenchError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

// Encoding our own values is an output failure, never malformed input.
fn encode_error(code: &str, err: impl ToString) -> BenchError {
    BenchError::Io(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => {
            let canonical_values = values.into_iter().map(canonicalize).collect();
            Value::Array(canonical_values)
        }
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, BenchError> {
    let value = serde_json::to_value(value).map_err(|err| encode_error("json_serialize", err))?;
    let canonical = canonicalize(value);
    let mut bytes = Vec::new();
    serde_json::to_writer(&mut bytes, &canonical).map_err(|err| encode_error("json_write", err))?;
    Ok(bytes)
}

/// Serializes a value into canonical, indented JSON for terminal output.
pub fn to_canonical_json_pretty<T: Serialize>(value: &T) -> Result<String, BenchError> {
    let value = serde_json::to_value(value).map_err(|err| encode_error("json_serialize", err))?;
    serde_json::to_string_pretty(&canonicalize(value)).map_err(|err| encode_error("json_write", err))
}

/// Deserializes a JSON document read from `path`, naming the file in any error.
pub fn from_json_slice<T: DeserializeOwned>(path: &Path, data: &[u8]) -> Result<T, BenchError> {
    serde_json::from_slice(data).map_err(|err| BenchError::from_json(path, &err))
}

/// Serializes a value into deterministic YAML.
pub fn to_yaml_string<T: Serialize>(value: &T) -> Result<String, BenchError> {
    serde_yaml::to_string(value)
        .map_err(|err| BenchError::Config(ErrorInfo::new("yaml_serialize", err.to_string())))
}

/// Deserializes a YAML payload into the requested type.
pub fn from_yaml_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, BenchError> {
    serde_yaml::from_slice(data)
        .map_err(|err| BenchError::Config(ErrorInfo::new("yaml_deserialize", err.to_string())))
}
