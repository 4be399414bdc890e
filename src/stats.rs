// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Descriptive statistics over latency samples.
//!
//! Percentiles use linear interpolation between closest ranks (type 7 in
//! Hyndman and Fan, the default estimator of numpy and pandas):
//! `h = (n - 1) * q`, then interpolate between the values at ranks
//! `floor(h)` and `floor(h) + 1` of the sorted data.

/// Quantile `q` in `[0.0, 1.0]` of already sorted data.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.max(0.0).min(1.0);
    let h = (sorted.len() - 1) as f64 * q;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = h - lower as f64;
    Some(sorted[lower] + fraction * (sorted[upper] - sorted[lower]))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). `NaN` for fewer than
/// two values.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (squares / (n - 1) as f64).sqrt()
}

/// Mean of 0/1 failure indicators as a percentage.
pub fn error_rate(indicators: &[f64]) -> Option<f64> {
    mean(indicators).map(|rate| rate * 100.0)
}

/// Ascending total order. A NaN sorts after every number instead of
/// leaving its neighbours unordered.
pub fn sort(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Summary of one group of latency samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Statistics {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Statistics {
    /// `None` for an empty group, so that no zero-count rows are ever
    /// produced.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sort(&mut sorted);

        Some(Self {
            count: sorted.len() as u64,
            mean: mean(values)?,
            std: std_dev(values),
            min: *sorted.first()?,
            max: *sorted.last()?,
            p95: quantile(&sorted, 0.95)?,
            p99: quantile(&sorted, 0.99)?,
        })
    }
}
