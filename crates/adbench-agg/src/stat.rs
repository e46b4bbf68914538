use std::iter::StepBy;
use std::num::NonZeroUsize;
use std::slice::Iter;

use adbench_core::errors::BenchError;
use serde::{Deserialize, Serialize};

/// Arithmetic mean, accumulated left to right without compensation.
pub fn mean(xs: &[f64]) -> Result<f64, BenchError> {
    if xs.is_empty() {
        return Err(BenchError::empty_input("mean"));
    }
    let mut total = 0.0;
    for x in xs {
        total += x;
    }
    Ok(total / xs.len() as f64)
}

/// Population variance: the mean of squared deviations from [`mean`].
pub fn variance(xs: &[f64]) -> Result<f64, BenchError> {
    if xs.is_empty() {
        return Err(BenchError::empty_input("variance"));
    }
    let m = mean(xs)?;
    let mut total = 0.0;
    for x in xs {
        let deviation = x - m;
        total += deviation * deviation;
    }
    Ok(total / xs.len() as f64)
}

/// Square root of the population [`variance`].
pub fn standard_deviation(xs: &[f64]) -> Result<f64, BenchError> {
    if xs.is_empty() {
        return Err(BenchError::empty_input("standard_deviation"));
    }
    Ok(variance(xs)?.sqrt())
}

/// The three reducers applied to one numeric projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values summarized.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population variance.
    pub variance: f64,
    /// Population standard deviation.
    pub sd: f64,
}

/// Computes a [`Summary`] of `xs`.
pub fn summarize(xs: &[f64]) -> Result<Summary, BenchError> {
    if xs.is_empty() {
        return Err(BenchError::empty_input("summarize"));
    }
    let mean = mean(xs)?;
    let variance = variance(xs)?;
    Ok(Summary {
        count: xs.len(),
        mean,
        variance,
        sd: variance.sqrt(),
    })
}

/// Element-wise mean and standard deviation across equal-length runs.
///
/// Treats `runs` as a `[run][step]` matrix and reduces along the run axis for
/// every step. Fails with `EmptyInput` when there are no runs and with
/// `RaggedInput` when any run differs in length from the first.
pub fn mean_and_sd_of_runs<R>(runs: &[R]) -> Result<(Vec<f64>, Vec<f64>), BenchError>
where
    R: AsRef<[f64]>,
{
    let Some(first) = runs.first() else {
        return Err(BenchError::empty_input("mean_and_sd_of_runs"));
    };
    let steps = first.as_ref().len();
    for (idx, run) in runs.iter().enumerate().skip(1) {
        let len = run.as_ref().len();
        if len != steps {
            return Err(BenchError::ragged(idx, steps, len));
        }
    }

    let mut means = Vec::with_capacity(steps);
    let mut sds = Vec::with_capacity(steps);
    let mut column = Vec::with_capacity(runs.len());
    for step in 0..steps {
        column.clear();
        column.extend(runs.iter().map(|run| run.as_ref()[step]));
        means.push(mean(&column)?);
        sds.push(standard_deviation(&column)?);
    }
    Ok((means, sds))
}

/// Mean trajectory of a set of runs with a one standard deviation envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunBand {
    /// Number of runs reduced.
    pub runs: usize,
    /// Per-step means.
    pub means: Vec<f64>,
    /// Per-step population standard deviations.
    pub sds: Vec<f64>,
    /// `means[i] - sds[i]`.
    pub lower: Vec<f64>,
    /// `means[i] + sds[i]`.
    pub upper: Vec<f64>,
}

/// Builds the [`RunBand`] of `runs`; see [`mean_and_sd_of_runs`] for failure modes.
pub fn run_band<R>(runs: &[R]) -> Result<RunBand, BenchError>
where
    R: AsRef<[f64]>,
{
    let (means, sds) = mean_and_sd_of_runs(runs)?;
    let (lower, upper) = means
        .iter()
        .zip(&sds)
        .map(|(mean, sd)| (mean - sd, mean + sd))
        .unzip();
    Ok(RunBand {
        runs: runs.len(),
        means,
        sds,
        lower,
        upper,
    })
}

/// Lazily yields the elements at indices `0, stride, 2 * stride, ...`.
///
/// The iterator is `Clone`, so it can be restarted from the beginning.
pub fn thinned<T>(series: &[T], stride: NonZeroUsize) -> StepBy<Iter<'_, T>> {
    series.iter().step_by(stride.get())
}

/// Eager form of [`thinned`].
pub fn thin<T: Clone>(series: &[T], stride: NonZeroUsize) -> Vec<T> {
    thinned(series, stride).cloned().collect()
}
