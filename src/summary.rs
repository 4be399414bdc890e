// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::format::{thousands, thousands_int};
use crate::stats::{error_rate, Statistics};
use crate::{Dataset, Platform};

use std::collections::BTreeMap;
use std::fmt;

pub const COLUMNS: [&str; 9] = [
    "Platform",
    "Count",
    "Mean (ms)",
    "Std Dev (ms)",
    "Min (ms)",
    "Max (ms)",
    "p95 (ms)",
    "p99 (ms)",
    "Error Rate (%)",
];

/// Latency statistics and error rate for one platform.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub platform: Platform,
    pub latency: Statistics,
    /// `None` when the platform has no failure-indicator samples
    pub error_rate: Option<f64>,
}

impl SummaryRow {
    /// display cells, in `COLUMNS` order
    pub fn cells(&self) -> [String; 9] {
        let l = &self.latency;
        [
            self.platform.to_string(),
            thousands_int(l.count),
            thousands(l.mean, 2),
            thousands(l.std, 2),
            thousands(l.min, 2),
            thousands(l.max, 2),
            thousands(l.p95, 2),
            thousands(l.p99, 2),
            thousands(self.error_rate.unwrap_or(f64::NAN), 2),
        ]
    }
}

/// One row per platform present in the latency view, ordered by label.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut latency: BTreeMap<Platform, Vec<f64>> = BTreeMap::new();
        for sample in dataset.latency() {
            latency
                .entry(sample.platform)
                .or_default()
                .push(sample.metric_value);
        }

        let mut failures: BTreeMap<Platform, Vec<f64>> = BTreeMap::new();
        for sample in dataset.errors() {
            failures
                .entry(sample.platform)
                .or_default()
                .push(sample.metric_value);
        }

        let mut rows = Vec::new();
        for (platform, values) in latency {
            let latency = match Statistics::from_values(&values) {
                Some(stats) => stats,
                None => continue,
            };
            if latency.std.is_nan() {
                warn!(
                    "{}: std dev is undefined for a single latency sample",
                    platform
                );
            }

            let error_rate = failures.get(&platform).and_then(|v| error_rate(v));
            if error_rate.is_none() {
                warn!("{}: no failure samples, error rate is missing", platform);
            }

            rows.push(SummaryRow {
                platform,
                latency,
                error_rate,
            });
        }

        for platform in failures.keys() {
            if !rows.iter().any(|r| r.platform == *platform) {
                warn!(
                    "{}: failure samples without latency samples are not reported",
                    platform
                );
            }
        }

        Self { rows }
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn get(&self, platform: Platform) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.platform == platform)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// header followed by the display cells of each row
    pub fn table(&self) -> Vec<Vec<String>> {
        let mut table = vec![COLUMNS.iter().map(|c| c.to_string()).collect()];
        table.extend(self.rows.iter().map(|r| r.cells().to_vec()));
        table
    }
}

/// Fixed width text table, the platform column left aligned and numbers
/// right aligned.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let table = self.table();
        let mut widths = [0; 9];
        for row in &table {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        for row in &table {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i == 0 {
                    line.push_str(&format!("{:<width$}", cell, width = widths[i]));
                } else {
                    line.push_str(&format!("  {:>width$}", cell, width = widths[i]));
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Run, Sample};
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn run(platform: Platform, index: usize, rows: &[(&str, f64)]) -> Run {
        let samples = rows
            .iter()
            .enumerate()
            .map(|(i, (metric, value))| Sample {
                platform,
                run: index,
                metric_name: metric.to_string(),
                metric_value: *value,
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
                elapsed: i as f64,
            })
            .collect();
        Run {
            platform,
            index,
            path: PathBuf::from("test.csv"),
            samples,
        }
    }

    fn latency(values: &[f64]) -> Vec<(&'static str, f64)> {
        values.iter().map(|v| ("http_req_duration", *v)).collect()
    }

    fn dataset(runs: Vec<Run>) -> Dataset {
        let mut dataset = Dataset::new("http_req_duration", "http_req_failed");
        for run in runs {
            dataset.push_run(run);
        }
        dataset
    }

    #[test]
    fn two_platforms() {
        let mut node = latency(&[100.0, 150.0, 200.0]);
        node.push(("http_req_failed", 0.0));
        let dataset = dataset(vec![
            run(Platform::Node, 1, &node),
            run(Platform::Node, 2, &latency(&[110.0, 160.0, 210.0])),
            run(Platform::Asp, 1, &latency(&[50.0, 60.0])),
            run(Platform::Asp, 2, &[("http_req_failed", 1.0), ("http_req_failed", 0.0)]),
        ]);
        let summary = Summary::from_dataset(&dataset);

        let platforms: Vec<Platform> = summary.rows().iter().map(|r| r.platform).collect();
        assert_eq!(platforms, vec![Platform::Asp, Platform::Node]);

        let node = summary.get(Platform::Node).unwrap();
        assert_eq!(node.latency.count, 6);
        assert!((node.latency.mean - 155.0).abs() < 1e-9);
        assert_eq!(node.error_rate, Some(0.0));

        let asp = summary.get(Platform::Asp).unwrap();
        assert_eq!(asp.latency.count, 2);
        assert_eq!(asp.error_rate, Some(50.0));
    }

    #[test]
    fn count_matches_latency_rows() {
        let dataset = dataset(vec![
            run(Platform::Node, 1, &latency(&[1.0, 2.0, 3.0, 4.0])),
            run(Platform::Asp, 1, &latency(&[9.0])),
        ]);
        let summary = Summary::from_dataset(&dataset);
        for row in summary.rows() {
            let rows = dataset
                .latency()
                .filter(|s| s.platform == row.platform)
                .count();
            assert_eq!(row.latency.count as usize, rows);
        }
    }

    #[test]
    fn one_failure_in_ten() {
        let mut rows = latency(&[10.0]);
        rows.extend(std::iter::repeat(("http_req_failed", 0.0)).take(9));
        rows.push(("http_req_failed", 1.0));
        let summary = Summary::from_dataset(&dataset(vec![run(Platform::Asp, 1, &rows)]));
        let asp = summary.get(Platform::Asp).unwrap();
        assert_eq!(asp.cells()[8], "10.00");
    }

    #[test]
    fn single_platform() {
        let summary = Summary::from_dataset(&dataset(vec![run(
            Platform::Node,
            1,
            &latency(&[100.0, 200.0]),
        )]));
        assert_eq!(summary.rows().len(), 1);
        assert!(summary.get(Platform::Asp).is_none());
    }

    #[test]
    fn missing_error_rate() {
        let summary = Summary::from_dataset(&dataset(vec![run(
            Platform::Node,
            1,
            &latency(&[1234.5, 1234.5]),
        )]));
        let node = summary.get(Platform::Node).unwrap();
        assert_eq!(node.error_rate, None);
        assert_eq!(
            node.cells(),
            [
                "node".to_string(),
                "2".to_string(),
                "1,234.50".to_string(),
                "0.00".to_string(),
                "1,234.50".to_string(),
                "1,234.50".to_string(),
                "1,234.50".to_string(),
                "1,234.50".to_string(),
                "nan".to_string(),
            ]
        );
    }

    #[test]
    fn failures_only_platform_has_no_row() {
        let summary = Summary::from_dataset(&dataset(vec![run(
            Platform::Asp,
            1,
            &[("http_req_failed", 1.0)],
        )]));
        assert!(summary.is_empty());
    }

    #[test]
    fn empty_dataset() {
        let summary = Summary::from_dataset(&dataset(Vec::new()));
        assert!(summary.is_empty());
        assert_eq!(summary.table().len(), 1);
    }

    #[test]
    fn text_table() {
        let summary = Summary::from_dataset(&dataset(vec![
            run(Platform::Node, 1, &latency(&[100.0, 200.0])),
            run(Platform::Asp, 1, &latency(&[1000.0, 3000.0])),
        ]));
        let text = summary.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Platform  Count"));
        assert!(lines[0].ends_with("Error Rate (%)"));
        assert!(lines[1].starts_with("asp"));
        assert!(lines[1].contains("2,000.00"));
        assert!(lines[2].starts_with("node"));
        assert!(lines[2].ends_with("nan"));
    }
}
