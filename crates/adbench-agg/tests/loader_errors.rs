
use std::fs;

use adbench_agg::{load_results, load_results_with, LoaderOptions};
use adbench_core::ErrorKind;
use fixtures::{condition, record, write_json};

#[test]
fn missing_directory_is_not_found() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let missing = temp.path().join("results");
    let err = load_results(&missing).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.path(), Some(missing.display().to_string().as_str()));
}

#[test]
fn file_instead_of_directory_is_not_found() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let file = temp.path().join("results.json");
    fs::write(&file, "[]").expect("write");
    let err = load_results(&file).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.info().hint.is_some());
}

#[test]
fn invalid_json_is_decode_error_with_position() {
    let temp = tempfile::tempdir().expect("tmp dir");
    write_json(
        temp.path(),
        "1.json",
        &record(condition(1000, "adnn", 100), 10.0, 5, &[1.0]),
    );
    fs::write(temp.path().join("2.json"), "{\n  \"condition\": {,\n}").expect("write");

    let err = load_results(temp.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.path().expect("path").ends_with("2.json"));
    assert_eq!(err.info().context["line"], "2");
}

#[test]
fn wrong_shape_is_schema_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    fs::write(
        temp.path().join("1.json"),
        r#"{"condition": {}, "elapsed": 3.0, "numParams": 1}"#,
    )
    .expect("write");
    let err = load_results(temp.path()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn only_matching_files_are_loaded_in_name_order() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let value = record(condition(1000, "adnn", 100), 10.0, 5, &[1.0]);
    write_json(temp.path(), "200.json", &value);
    write_json(temp.path(), "100.json", &value);
    fs::write(temp.path().join("notes.txt"), "not a result").expect("write");
    fs::create_dir(temp.path().join("nested.json")).expect("mkdir");
    write_json(&temp.path().join("nested.json"), "300.json", &value);

    let loaded = load_results(temp.path()).expect("load");
    let names: Vec<_> = loaded
        .iter()
        .map(|loaded| loaded.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["100.json", "200.json"]);
}

#[test]
fn custom_pattern_narrows_the_selection() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let value = record(condition(1000, "adnn", 100), 10.0, 5, &[1.0]);
    write_json(temp.path(), "keep-1.json", &value);
    write_json(temp.path(), "skip-1.json", &value);
    let opts = LoaderOptions {
        pattern: "keep-*.json".to_string(),
    };
    let loaded = load_results_with(temp.path(), &opts).expect("load");
    assert_eq!(loaded.len(), 1);
}

#[test]
fn invalid_glob_is_config_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let opts = LoaderOptions {
        pattern: "[".to_string(),
    };
    let err = load_results_with(temp.path(), &opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn empty_directory_loads_nothing() {
    let temp = tempfile::tempdir().expect("tmp dir");
    assert!(load_results(temp.path()).expect("load").is_empty());
}
