// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const LABEL: &str = "k6-analysis";

/// Line oriented logger writing to stdout
pub struct SimpleLogger {
    level: LevelFilter,
}

impl SimpleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// install as the global logger
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(level))
    }
}

fn line(record: &Record) -> String {
    // module paths are only interesting when debugging
    let target = if record.level() >= Level::Debug {
        record.target()
    } else {
        LABEL
    };
    format!(
        "{} {:<5} [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        target,
        record.args()
    )
}

impl Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", line(record));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format() {
        let warn = line(
            &Record::builder()
                .args(format_args!("no files for {}", "asp"))
                .level(Level::Warn)
                .target("k6_analysis::loader")
                .build(),
        );
        assert!(warn.ends_with("WARN  [k6-analysis] no files for asp"));

        let debug = line(
            &Record::builder()
                .args(format_args!("run 1"))
                .level(Level::Debug)
                .target("k6_analysis::loader")
                .build(),
        );
        assert!(debug.ends_with("DEBUG [k6_analysis::loader] run 1"));
    }

    #[test]
    fn filtering() {
        let logger = SimpleLogger::new(LevelFilter::Info);
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
    }
}
