// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Platform;

use chrono::{DateTime, Utc};

use std::collections::BTreeMap;
use std::path::PathBuf;

/// A single measurement row, tagged with the run it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    pub platform: Platform,
    /// 1-based position of the run file in sorted order
    pub run: usize,
    pub metric_name: String,
    pub metric_value: f64,
    pub timestamp: DateTime<Utc>,
    /// seconds since the earliest timestamp of this sample's own run
    pub elapsed: f64,
}

/// All samples of one export file.
#[derive(Clone, Debug)]
pub struct Run {
    pub platform: Platform,
    pub index: usize,
    pub path: PathBuf,
    pub samples: Vec<Sample>,
}

/// Combined samples of every run for both platforms, in load order.
#[derive(Clone, Debug)]
pub struct Dataset {
    samples: Vec<Sample>,
    runs: BTreeMap<Platform, usize>,
    latency_metric: String,
    failure_metric: String,
}

impl Dataset {
    pub fn new(latency_metric: &str, failure_metric: &str) -> Self {
        Self {
            samples: Vec::new(),
            runs: BTreeMap::new(),
            latency_metric: latency_metric.to_string(),
            failure_metric: failure_metric.to_string(),
        }
    }

    /// append a run, keeping its row order
    pub fn push_run(&mut self, run: Run) {
        *self.runs.entry(run.platform).or_insert(0) += 1;
        self.samples.extend(run.samples);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// samples of the named metric, exact and case-sensitive match
    pub fn metric<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| s.metric_name == name)
    }

    pub fn latency(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.metric(&self.latency_metric)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.metric(&self.failure_metric)
    }

    /// number of runs loaded for the platform
    pub fn runs(&self, platform: Platform) -> usize {
        self.runs.get(&platform).copied().unwrap_or(0)
    }

    /// largest run count across platforms
    pub fn max_runs(&self) -> usize {
        self.runs.values().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(platform: Platform, run: usize, metric: &str, value: f64) -> Sample {
        Sample {
            platform,
            run,
            metric_name: metric.to_string(),
            metric_value: value,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            elapsed: 0.0,
        }
    }

    fn run(platform: Platform, index: usize, samples: Vec<Sample>) -> Run {
        Run {
            platform,
            index,
            path: PathBuf::from(format!("run-{}.csv", index)),
            samples,
        }
    }

    #[test]
    fn views() {
        let mut dataset = Dataset::new("http_req_duration", "http_req_failed");
        dataset.push_run(run(
            Platform::Node,
            1,
            vec![
                sample(Platform::Node, 1, "http_req_duration", 10.0),
                sample(Platform::Node, 1, "http_req_failed", 0.0),
                sample(Platform::Node, 1, "HTTP_REQ_DURATION", 99.0),
                sample(Platform::Node, 1, "http_reqs", 1.0),
            ],
        ));
        dataset.push_run(run(
            Platform::Asp,
            1,
            vec![sample(Platform::Asp, 1, "http_req_duration", 20.0)],
        ));

        assert_eq!(dataset.len(), 5);
        let latency: Vec<f64> = dataset.latency().map(|s| s.metric_value).collect();
        assert_eq!(latency, vec![10.0, 20.0]);
        assert_eq!(dataset.errors().count(), 1);
        assert_eq!(dataset.metric("http_reqs").count(), 1);
    }

    #[test]
    fn run_counts() {
        let mut dataset = Dataset::new("a", "b");
        assert_eq!(dataset.max_runs(), 0);
        assert!(dataset.is_empty());
        dataset.push_run(run(Platform::Node, 1, Vec::new()));
        dataset.push_run(run(Platform::Node, 2, Vec::new()));
        dataset.push_run(run(Platform::Asp, 1, Vec::new()));
        assert_eq!(dataset.runs(Platform::Node), 2);
        assert_eq!(dataset.runs(Platform::Asp), 1);
        assert_eq!(dataset.max_runs(), 2);
        assert!(dataset.is_empty());
    }
}
