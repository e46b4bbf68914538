
use std::collections::BTreeMap;
use std::fs;

use adbench_agg::serde::{from_yaml_slice, to_canonical_json_bytes, to_yaml_string};
use adbench_agg::{load_config, load_results, write_record, AggConfig, ConditionSchema};
use adbench_core::{ErrorKind, ResultRecord};
use fixtures::{condition, record};

fn sample_record() -> ResultRecord {
    serde_json::from_value(record(condition(1000, "pytorch", 200), 812.5, 1234, &[5.0, 4.0]))
        .expect("record")
}

#[test]
fn stored_record_is_loadable() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let dir = temp.path().join("results");
    let path = write_record(&dir, &sample_record(), 1_507_000_000_123, &ConditionSchema::default())
        .expect("write");
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("1507000000123.json")
    );

    let loaded = load_results(&dir).expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].record, sample_record());
}

#[test]
fn existing_record_is_never_overwritten() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let schema = ConditionSchema::default();
    write_record(temp.path(), &sample_record(), 7, &schema).expect("first write");
    let err = write_record(temp.path(), &sample_record(), 7, &schema).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.info().code, "record_exists");
}

#[test]
fn refused_write_leaves_only_complete_records() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let schema = ConditionSchema::default();
    write_record(temp.path(), &sample_record(), 7, &schema).expect("first write");
    write_record(temp.path(), &sample_record(), 7, &schema).unwrap_err();
    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["7.json".to_string()]);
    assert_eq!(load_results(temp.path()).expect("load").len(), 1);
}

#[test]
fn unencodable_values_are_output_errors() {
    let mut map = BTreeMap::new();
    map.insert((1u8, 2u8), 3u8);
    let err = to_canonical_json_bytes(&map).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.info().code, "json_serialize");
}

#[test]
fn invalid_condition_is_not_stored() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let mut bad = sample_record();
    bad.condition.remove("xDim");
    let err = write_record(temp.path(), &bad, 1, &ConditionSchema::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn config_defaults_fill_missing_sections() {
    let config: AggConfig = from_yaml_slice(b"runs:\n  stride: 50\n").expect("yaml");
    assert_eq!(config.results.pattern, "*.json");
    assert_eq!(config.runs.stride.get(), 50);
    assert_eq!(config.runs.run_field, "run");
    assert_eq!(config.condition_fields, ConditionSchema::default());
}

#[test]
fn config_rejects_zero_stride_and_unknown_keys() {
    assert!(from_yaml_slice::<AggConfig>(b"runs:\n  stride: 0\n").is_err());
    assert!(from_yaml_slice::<AggConfig>(b"result:\n  pattern: x\n").is_err());
    assert!(from_yaml_slice::<AggConfig>(b"condition_fields: [N, N]\n").is_err());
}

#[test]
fn load_config_validates_run_pattern() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let path = temp.path().join("adbench.yaml");
    fs::write(&path, "runs:\n  pattern: \"{guide}-{length}\"\n").expect("write");
    let err = load_config(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.path(), Some(path.display().to_string().as_str()));

    let missing = load_config(&temp.path().join("absent.yaml")).unwrap_err();
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[test]
fn config_survives_yaml_round_trip() {
    let config = AggConfig::default();
    let yaml = to_yaml_string(&config).expect("yaml");
    let restored: AggConfig = from_yaml_slice(yaml.as_bytes()).expect("decode");
    assert_eq!(restored, config);
    restored.validate().expect("valid");
}
