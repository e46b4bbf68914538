use std::collections::BTreeSet;

use adbench_core::errors::{BenchError, ErrorInfo};
use adbench_core::{ConditionKey, ConditionValue, ResultRecord};
use serde::{Deserialize, Serialize};

/// Condition fields written by the benchmark drivers, in key order.
pub const DEFAULT_CONDITION_FIELDS: [&str; 8] = [
    "N",
    "adBackend",
    "batchSize",
    "hDim",
    "numSteps",
    "stepSize",
    "xDim",
    "zDim",
];

/// Ordered set of condition fields a record must carry, exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ConditionSchema {
    fields: Vec<String>,
}

impl ConditionSchema {
    /// Builds a schema from an ordered, duplicate-free, non-empty field list.
    pub fn new(fields: Vec<String>) -> Result<Self, BenchError> {
        if fields.is_empty() {
            return Err(BenchError::Config(ErrorInfo::new(
                "empty_condition_fields",
                "condition_fields must name at least one field",
            )));
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.as_str()) {
                return Err(BenchError::Config(
                    ErrorInfo::new("duplicate_condition_field", format!("{field} listed twice"))
                        .with_context("field", field.clone()),
                ));
            }
        }
        Ok(Self { fields })
    }

    /// Returns the fields in key order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Extracts the condition key of `record`.
    ///
    /// The record's condition must contain exactly the schema's fields and
    /// every value must be a JSON scalar.
    pub fn key_of(&self, record: &ResultRecord) -> Result<ConditionKey, BenchError> {
        let condition = &record.condition;
        let missing: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| !condition.contains_key(field.as_str()))
            .map(String::as_str)
            .collect();
        let unexpected: Vec<&str> = condition
            .keys()
            .filter(|name| !self.fields.iter().any(|field| field == *name))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() || !unexpected.is_empty() {
            return Err(BenchError::Schema(
                ErrorInfo::new(
                    "condition_fields",
                    format!(
                        "condition has {} fields, expected exactly {}",
                        condition.len(),
                        self.fields.len()
                    ),
                )
                .with_context("missing", missing.join(","))
                .with_context("unexpected", unexpected.join(",")),
            ));
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let raw = &condition[field.as_str()];
            let value = ConditionValue::from_json(raw).ok_or_else(|| {
                BenchError::Schema(
                    ErrorInfo::new("condition_value", format!("{field} is not a scalar: {raw}"))
                        .with_context("field", field.clone()),
                )
            })?;
            values.push(value);
        }
        Ok(ConditionKey::new(values))
    }
}

impl Default for ConditionSchema {
    fn default() -> Self {
        Self {
            fields: DEFAULT_CONDITION_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
        }
    }
}

impl TryFrom<Vec<String>> for ConditionSchema {
    type Error = BenchError;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<ConditionSchema> for Vec<String> {
    fn from(schema: ConditionSchema) -> Self {
        schema.fields
    }
}

/// Extracts the condition key of `record` using the default driver fields.
pub fn condition_key(record: &ResultRecord) -> Result<ConditionKey, BenchError> {
    ConditionSchema::default().key_of(record)
}
