// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Latency comparison reports for repeated k6 load-test runs against the
//! Node.js and ASP.NET implementations of the same api.
//!
//! The pipeline loads every run export of a platform folder, summarizes
//! latency and error rate per platform, prints the summary and renders it
//! together with a latency time series to a PNG.

#[macro_use]
extern crate log;

mod config;
mod dataset;
mod error;
pub mod format;
pub mod loader;
mod logger;
mod platform;
pub mod plot;
pub mod stats;
mod summary;

pub use crate::config::{Config, ConfigFile, PhaseLabel, Phases, NAME, VERSION};
pub use crate::dataset::{Dataset, Run, Sample};
pub use crate::error::{Error, Result};
pub use crate::logger::SimpleLogger;
pub use crate::platform::Platform;
pub use crate::summary::{Summary, SummaryRow, COLUMNS};

use std::path::PathBuf;

/// Load and summarize the runs of the configured platform folder.
pub fn analyze(config: &Config) -> Result<(Dataset, Summary)> {
    let dataset = loader::load(config)?;
    let summary = Summary::from_dataset(&dataset);

    if summary.is_empty() {
        return Err(Error::NoData {
            folder: config.platform_folder().to_string(),
        });
    }

    Ok((dataset, summary))
}

/// Run the full report: analyze, print the summary to stdout, then render
/// the chart. Returns the path of the written image.
pub fn run(config: &Config) -> Result<PathBuf> {
    config.print();

    let (dataset, summary) = analyze(config)?;

    println!();
    println!("--- Summary Statistics (/api/{}) ---", config.endpoint());
    print!("{}", summary);
    println!();

    plot::render(config, &dataset, &summary)
}
