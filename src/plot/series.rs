// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::stats::{mean, std_dev};
use crate::{Platform, Sample};

use std::collections::BTreeMap;

/// Mean and spread of the latency samples in one time bucket, across all
/// runs of a platform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// start of the bucket, in elapsed seconds
    pub elapsed: f64,
    pub mean: f64,
    /// `NaN` when the bucket holds a single sample
    pub std: f64,
    pub count: usize,
}

impl Point {
    pub fn lower(&self) -> f64 {
        if self.std.is_nan() {
            self.mean
        } else {
            self.mean - self.std
        }
    }

    pub fn upper(&self) -> f64 {
        if self.std.is_nan() {
            self.mean
        } else {
            self.mean + self.std
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    pub platform: Platform,
    pub points: Vec<Point>,
}

impl TimeSeries {
    /// Bucket samples by elapsed time into `bin` second wide buckets and
    /// aggregate each bucket, one series per platform. Runs are aligned on
    /// their own start, so the overlay assumes every run follows the same
    /// stage layout.
    pub fn from_samples<'a, I>(samples: I, bin: f64) -> Vec<TimeSeries>
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        let bin = if bin.is_finite() && bin > 0.0 { bin } else { 1.0 };

        let mut buckets: BTreeMap<Platform, BTreeMap<i64, Vec<f64>>> = BTreeMap::new();
        for sample in samples {
            let bucket = (sample.elapsed / bin).floor() as i64;
            buckets
                .entry(sample.platform)
                .or_default()
                .entry(bucket)
                .or_default()
                .push(sample.metric_value);
        }

        buckets
            .into_iter()
            .map(|(platform, buckets)| TimeSeries {
                platform,
                points: buckets
                    .into_iter()
                    .filter_map(|(bucket, values)| {
                        Some(Point {
                            elapsed: bucket as f64 * bin,
                            mean: mean(&values)?,
                            std: std_dev(&values),
                            count: values.len(),
                        })
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn max_elapsed(&self) -> Option<f64> {
        self.points.last().map(|p| p.elapsed)
    }
}
