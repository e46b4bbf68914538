use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single benchmark run as persisted by the training drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    /// Configuration the run was executed with, keyed by field name.
    pub condition: BTreeMap<String, Value>,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed: f64,
    /// Number of trainable scalar parameters in the model.
    pub num_params: u64,
    /// Objective value recorded after each training step.
    pub history: Vec<f64>,
}

impl ResultRecord {
    /// Returns the automatic-differentiation backend named in the condition.
    pub fn backend(&self) -> Option<&str> {
        self.condition.get("adBackend").and_then(Value::as_str)
    }

    /// Returns the objective value recorded after the last step.
    pub fn final_objective(&self) -> Option<f64> {
        self.history.last().copied()
    }
}
