use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use adbench_core::errors::{BenchError, ErrorInfo};

use crate::report::{ScalingPoint, SessionReport};
use crate::serde::to_canonical_json_bytes;

fn export_error(err: impl ToString) -> BenchError {
    BenchError::Io(ErrorInfo::new("export", err.to_string()))
}

/// Writes the report as canonical JSON.
pub fn export_report_json(report: &SessionReport, out_path: &Path) -> Result<(), BenchError> {
    let bytes = to_canonical_json_bytes(report)?;
    fs::write(out_path, bytes).map_err(|err| BenchError::from_io("export", out_path, &err))
}

/// Writes `backend,num_params,mean_elapsed_secs` rows to `writer`.
pub fn write_scaling_csv<W: Write>(
    writer: W,
    scaling: &BTreeMap<String, Vec<ScalingPoint>>,
) -> Result<(), BenchError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["backend", "num_params", "mean_elapsed_secs"])
        .map_err(export_error)?;
    for (backend, points) in scaling {
        for point in points {
            wtr.write_record([
                backend.clone(),
                point.num_params.to_string(),
                point.mean_elapsed_secs.to_string(),
            ])
            .map_err(export_error)?;
        }
    }
    wtr.flush().map_err(export_error)
}

/// Writes the scaling table to `out_path`.
pub fn export_scaling_csv(
    scaling: &BTreeMap<String, Vec<ScalingPoint>>,
    out_path: &Path,
) -> Result<(), BenchError> {
    let file =
        fs::File::create(out_path).map_err(|err| BenchError::from_io("export", out_path, &err))?;
    write_scaling_csv(file, scaling).map_err(|err| err.at_path(out_path))
}
