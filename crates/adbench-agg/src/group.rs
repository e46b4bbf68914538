use std::collections::{BTreeMap, HashMap};

use adbench_core::errors::BenchError;
use adbench_core::{ConditionKey, ResultRecord};
use serde_json::Value;

use crate::loader::LoadedRecord;
use crate::schema::ConditionSchema;
use crate::stat::{summarize, Summary};

/// All loaded records sharing one condition key, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGroup {
    key: ConditionKey,
    records: Vec<LoadedRecord>,
}

impl ResultGroup {
    /// Condition key shared by every record of the group.
    pub fn key(&self) -> &ConditionKey {
        &self.key
    }

    /// Records of the group in load order. Never empty.
    pub fn records(&self) -> &[LoadedRecord] {
        &self.records
    }

    /// Number of runs in the group.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always `false`; groups are created by their first record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record of the group, whose condition stands for the whole group.
    pub fn representative(&self) -> &ResultRecord {
        &self.records[0].record
    }

    /// Condition fields shared by every record of the group.
    pub fn condition(&self) -> &BTreeMap<String, Value> {
        &self.representative().condition
    }

    /// Parameter count of the representative record.
    pub fn num_params(&self) -> u64 {
        self.representative().num_params
    }

    /// Returns `true` when every record reports the same parameter count.
    pub fn num_params_consistent(&self) -> bool {
        let expected = self.num_params();
        self.records
            .iter()
            .all(|loaded| loaded.record.num_params == expected)
    }

    /// Projects one numeric value out of every record, in load order.
    pub fn project<F>(&self, f: F) -> Vec<f64>
    where
        F: Fn(&ResultRecord) -> f64,
    {
        self.records.iter().map(|loaded| f(&loaded.record)).collect()
    }

    /// Elapsed milliseconds of every run.
    pub fn elapsed(&self) -> Vec<f64> {
        self.project(|record| record.elapsed)
    }

    /// Objective histories of every run.
    pub fn histories(&self) -> Vec<&[f64]> {
        self.records
            .iter()
            .map(|loaded| loaded.record.history.as_slice())
            .collect()
    }

    /// Summarizes a numeric projection of the group.
    pub fn summarize_by<F>(&self, f: F) -> Result<Summary, BenchError>
    where
        F: Fn(&ResultRecord) -> f64,
    {
        summarize(&self.project(f))
    }
}

/// Records partitioned by condition key, enumerated in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedResults {
    schema: ConditionSchema,
    groups: BTreeMap<ConditionKey, ResultGroup>,
}

impl GroupedResults {
    /// Schema the keys were extracted with.
    pub fn schema(&self) -> &ConditionSchema {
        &self.schema
    }

    /// Number of distinct conditions.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` when no records were grouped.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all groups.
    pub fn total_records(&self) -> usize {
        self.groups.values().map(ResultGroup::len).sum()
    }

    /// Looks up the group for `key`.
    pub fn get(&self, key: &ConditionKey) -> Option<&ResultGroup> {
        self.groups.get(key)
    }

    /// Iterates groups in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConditionKey, &ResultGroup)> {
        self.groups.iter()
    }

    /// Iterates groups in ascending key order.
    pub fn groups(&self) -> impl Iterator<Item = &ResultGroup> {
        self.groups.values()
    }

    /// Consumes the grouping and returns the underlying map.
    pub fn into_map(self) -> BTreeMap<ConditionKey, ResultGroup> {
        self.groups
    }
}

/// Partitions `records` by the key `schema` extracts.
///
/// A record whose condition does not match the schema aborts the whole call;
/// the error names its source file.
pub fn group_results_with(
    records: Vec<LoadedRecord>,
    schema: &ConditionSchema,
) -> Result<GroupedResults, BenchError> {
    let mut partition: HashMap<ConditionKey, Vec<LoadedRecord>> = HashMap::new();
    for loaded in records {
        let key = schema
            .key_of(&loaded.record)
            .map_err(|err| err.at_path(&loaded.path))?;
        partition.entry(key).or_default().push(loaded);
    }
    let groups = partition
        .into_iter()
        .map(|(key, records)| {
            let group = ResultGroup {
                key: key.clone(),
                records,
            };
            (key, group)
        })
        .collect();
    Ok(GroupedResults {
        schema: schema.clone(),
        groups,
    })
}

/// Partitions `records` by the default driver condition fields.
pub fn group_results(records: Vec<LoadedRecord>) -> Result<GroupedResults, BenchError> {
    group_results_with(records, &ConditionSchema::default())
}
