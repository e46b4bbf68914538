use std::fs;
use std::path::Path;

use adbench_agg::{build_report, group_results, load_results};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

fn populate(dir: &Path) {
    let backends = ["adnn", "pytorch"];
    let hidden = [10, 50, 100, 500, 1000];
    let mut stamp = 1_507_000_000_000u64;
    for backend in backends {
        for h_dim in hidden {
            for run in 0..8 {
                let record = json!({
                    "condition": {
                        "N": 1000, "adBackend": backend, "batchSize": 50, "hDim": h_dim,
                        "numSteps": 100, "stepSize": 0.001, "xDim": 784, "zDim": 20
                    },
                    "elapsed": 1000.0 + (h_dim * 3 + run) as f64,
                    "numParams": (784 * h_dim + h_dim * 20) * 2,
                    "history": (0..100).map(|step| -500.0 + step as f64 + run as f64).collect::<Vec<_>>()
                });
                fs::write(
                    dir.join(format!("{stamp}.json")),
                    serde_json::to_vec(&record).expect("encode"),
                )
                .expect("write fixture");
                stamp += 1;
            }
        }
    }
}

fn bench_group(c: &mut Criterion) {
    let temp = tempfile::tempdir().expect("tmp dir");
    populate(temp.path());

    c.bench_function("load_group_report_80_records", |b| {
        b.iter(|| {
            let grouped = group_results(load_results(temp.path()).expect("load")).expect("group");
            build_report(temp.path(), &grouped).expect("report")
        })
    });

    let records = load_results(temp.path()).expect("load");
    c.bench_function("group_80_records", |b| {
        b.iter(|| group_results(records.clone()).expect("group"))
    });
}

criterion_group!(benches, bench_group);
criterion_main!(benches);
