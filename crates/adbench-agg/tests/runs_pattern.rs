
use std::fs;
use std::num::NonZeroUsize;

use adbench_agg::{
    group_runs, load_run, load_run_series, summarize_runs, RunKey, RunPattern,
};
use adbench_core::ErrorKind;
use fixtures::write_json;
use serde_json::json;

fn stride(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).expect("non-zero stride")
}

#[test]
fn labelled_pattern_recovers_named_fields() {
    let pattern = RunPattern::parse("cubo-{guide}-n-{n}-length-{length}-{run}").unwrap();
    let key = pattern.match_stem("cubo-rnnut-n-32-length-16-2").expect("match");
    assert_eq!(key.get("guide"), Some("rnnut"));
    assert_eq!(key.get("n"), Some("32"));
    assert_eq!(key.get("length"), Some("16"));
    assert_eq!(key.get("run"), Some("2"));
    assert_eq!(
        pattern.fields().collect::<Vec<_>>(),
        vec!["guide", "n", "length", "run"]
    );
}

#[test]
fn literals_must_match_exactly() {
    let pattern = RunPattern::parse("cubo-{guide}-n-{n}-length-{length}-{run}").unwrap();
    assert!(pattern.match_stem("elbo-rnn-n-32-length-16-2").is_none());
    assert!(pattern.match_stem("cubo-rnn-n-32-len-16-2").is_none());
    assert!(pattern.match_stem("cubo-rnn-n--length-16-2").is_none());
}

#[test]
fn earlier_fields_take_the_longest_value() {
    let pattern = RunPattern::parse("{config}_{timestamp}").unwrap();
    let key = pattern.match_stem("vae_adam_lr01_1507000000").expect("match");
    assert_eq!(key.get("config"), Some("vae_adam_lr01"));
    assert_eq!(key.get("timestamp"), Some("1507000000"));
}

#[test]
fn render_inverts_match() {
    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let key = RunKey::new()
        .with("guide", "gru")
        .with("length", "8")
        .with("run", "1");
    let stem = pattern.render(&key).unwrap();
    assert_eq!(stem, "gru-8-1");
    assert_eq!(pattern.match_stem(&stem), Some(key));

    let err = pattern.render(&RunKey::new().with("guide", "gru")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.info().context["field"], "length");
}

#[test]
fn duplicate_fields_are_config_errors() {
    let err = RunPattern::parse("{run}-{run}").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.info().context["pattern"], "{run}-{run}");
}

#[test]
fn directory_runs_are_grouped_and_thinned() {
    let temp = tempfile::tempdir().expect("tmp dir");
    write_json(temp.path(), "rnn-2-0.json", &json!([1.0, 9.0, 3.0, 9.0, 5.0]));
    write_json(temp.path(), "rnn-2-1.json", &json!([3.0, 9.0, 3.0, 9.0, 1.0]));
    write_json(temp.path(), "gru-2-0.json", &json!([0.0, 0.0, 0.0]));
    write_json(temp.path(), "summary.json", &json!({"ignored": true}));

    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let series = load_run_series(temp.path(), &pattern, stride(2)).expect("load");
    assert_eq!(series.len(), 3);
    assert_eq!(series[1].values, vec![1.0, 3.0, 5.0]);

    let groups = group_runs(series, "run").expect("group");
    let rnn = RunKey::new().with("guide", "rnn").with("length", "2");
    assert_eq!(groups[&rnn].len(), 2);

    let reports = summarize_runs(temp.path(), &pattern, "run", stride(2)).expect("summary");
    assert_eq!(reports.len(), 2);
    let rnn_report = reports.iter().find(|report| report.key == rnn).unwrap();
    assert_eq!(rnn_report.band.means, vec![2.0, 3.0, 3.0]);
    assert_eq!(rnn_report.band.sds, vec![1.0, 0.0, 2.0]);
    assert_eq!(rnn_report.last.as_ref().map(|last| last.mean), Some(3.0));
}

#[test]
fn empty_runs_reduce_to_an_empty_band() {
    let temp = tempfile::tempdir().expect("tmp dir");
    write_json(temp.path(), "rnn-2-0.json", &json!([]));
    write_json(temp.path(), "rnn-2-1.json", &json!([]));
    write_json(temp.path(), "gru-2-0.json", &json!([4.0]));
    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let reports = summarize_runs(temp.path(), &pattern, "run", stride(1)).expect("summary");
    assert_eq!(reports.len(), 2);

    let rnn = RunKey::new().with("guide", "rnn").with("length", "2");
    let rnn_report = reports.iter().find(|report| report.key == rnn).unwrap();
    assert_eq!(rnn_report.band.runs, 2);
    assert!(rnn_report.band.means.is_empty());
    assert!(rnn_report.band.sds.is_empty());
    assert!(rnn_report.last.is_none());

    let gru = reports.iter().find(|report| report.key != rnn).unwrap();
    assert_eq!(gru.last.as_ref().map(|last| last.mean), Some(4.0));
}

#[test]
fn ragged_runs_name_the_offending_file() {
    let temp = tempfile::tempdir().expect("tmp dir");
    write_json(temp.path(), "rnn-2-0.json", &json!([1.0, 2.0, 3.0]));
    write_json(temp.path(), "rnn-2-1.json", &json!([1.0, 2.0]));
    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let err = summarize_runs(temp.path(), &pattern, "run", stride(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RaggedInput);
    assert!(err.path().expect("path").ends_with("rnn-2-1.json"));
    assert_eq!(err.info().context["group"], "guide=rnn, length=2");
}

#[test]
fn run_field_must_be_captured() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let pattern = RunPattern::parse("{guide}-{length}").unwrap();
    let err = summarize_runs(temp.path(), &pattern, "run", stride(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn missing_single_run_is_not_an_error() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let key = RunKey::new()
        .with("guide", "lstm")
        .with("length", "32")
        .with("run", "0");
    assert!(load_run(temp.path(), &pattern, &key, stride(50))
        .expect("load")
        .is_none());

    fs::write(temp.path().join("lstm-32-0.json"), "[1, 2, 3]").expect("write");
    let run = load_run(temp.path(), &pattern, &key, stride(2))
        .expect("load")
        .expect("present");
    assert_eq!(run.values, vec![1.0, 3.0]);
}

#[test]
fn malformed_run_file_aborts() {
    let temp = tempfile::tempdir().expect("tmp dir");
    fs::write(temp.path().join("rnn-2-0.json"), "[1, 2,").expect("write");
    let pattern = RunPattern::parse("{guide}-{length}-{run}").unwrap();
    let err = load_run_series(temp.path(), &pattern, stride(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}
