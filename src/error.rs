// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: {0}")]
    Usage(String),
    #[error("no latency samples found for platform folder: {folder}")]
    NoData { folder: String },
    #[error("malformed input in {path}, line {line}: {message}")]
    MalformedInput {
        path: PathBuf,
        line: u64,
        message: String,
    },
    #[error("output directory does not exist: {0}")]
    OutputPath(PathBuf),
    #[error("bad config file {path}: {message}")]
    Config { path: PathBuf, message: String },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render chart: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, line: u64, message: impl ToString) -> Self {
        Error::MalformedInput {
            path: path.into(),
            line,
            message: message.to_string(),
        }
    }
}
