// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Discovery and parsing of k6 CSV exports.
//!
//! Each platform folder holds one file per run, named
//! `<endpoint>-test-<platform>-<sequence>.csv`. Run indices follow the
//! lexicographic order of the file names, so sequence numbers need to be
//! zero padded for the runs to be numbered chronologically.

use crate::{Config, Dataset, Error, Platform, Result, Run, Sample};

use chrono::{DateTime, TimeZone, Utc};
use serde_derive::*;

use std::fs;
use std::path::{Path, PathBuf};

const COLUMNS: [&str; 3] = ["metric_name", "metric_value", "timestamp"];

/// The columns of a k6 CSV export that the report uses. k6 writes many
/// more, which are ignored.
#[derive(Debug, Deserialize)]
struct Record {
    metric_name: String,
    metric_value: f64,
    timestamp: f64,
}

/// Load every run of both platforms for the configured platform folder.
pub fn load(config: &Config) -> Result<Dataset> {
    let dir = config.run_dir();
    info!("loading data from {}", dir.display());

    let mut dataset = Dataset::new(config.latency_metric(), config.failure_metric());
    for &platform in Platform::LOAD_ORDER.iter() {
        let prefix = platform.file_prefix(config.endpoint());
        let files = discover(&dir, &prefix)?;
        if files.is_empty() {
            warn!(
                "no {} runs found matching {}*.csv in {}",
                platform,
                prefix,
                dir.display()
            );
        }
        for run in load_platform(&files, platform)? {
            dataset.push_run(run);
        }
    }

    info!(
        "loaded {} samples from {} node and {} asp runs",
        dataset.len(),
        dataset.runs(Platform::Node),
        dataset.runs(Platform::Asp)
    );
    Ok(dataset)
}

/// Files in `dir` named `<prefix>*.csv`, sorted by name.
pub fn discover(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let matched = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(prefix) && name.ends_with(".csv"))
            .unwrap_or(false);
        if matched && path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Load the given files as consecutive runs of one platform.
pub fn load_platform(files: &[PathBuf], platform: Platform) -> Result<Vec<Run>> {
    files
        .iter()
        .enumerate()
        .map(|(i, path)| load_run(path, platform, i + 1))
        .collect()
}

pub fn load_run(path: &Path, platform: Platform, index: usize) -> Result<Run> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    for column in COLUMNS.iter() {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::malformed(
                path,
                1,
                format!("missing column `{}`", column),
            ));
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let raw = result.map_err(|e| csv_error(path, e))?;
        let line = raw.position().map(|p| p.line()).unwrap_or(0);
        let record: Record = raw
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(path, e))?;
        if !record.metric_value.is_finite() {
            return Err(Error::malformed(
                path,
                line,
                format!("invalid metric value: {}", record.metric_value),
            ));
        }
        let timestamp = to_datetime(record.timestamp).ok_or_else(|| {
            Error::malformed(
                path,
                line,
                format!("invalid timestamp: {}", record.timestamp),
            )
        })?;
        rows.push((record, timestamp));
    }

    let start = rows.iter().map(|(_, ts)| *ts).min();
    let samples: Vec<Sample> = rows
        .into_iter()
        .map(|(record, timestamp)| Sample {
            platform,
            run: index,
            metric_name: record.metric_name,
            metric_value: record.metric_value,
            timestamp,
            elapsed: start.map(|start| seconds_between(start, timestamp)).unwrap_or(0.0),
        })
        .collect();

    debug!(
        "{} run {}: {} samples from {}",
        platform,
        index,
        samples.len(),
        path.display()
    );

    Ok(Run {
        platform,
        index,
        path: path.to_path_buf(),
        samples,
    })
}

/// Convert fractional seconds since the unix epoch.
fn to_datetime(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    Utc.timestamp_opt(whole as i64, nanos).single()
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    match delta.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(path, source),
        _ => Error::malformed(path, line, message),
    }
}
