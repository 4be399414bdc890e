// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use log::LevelFilter;
use serde_derive::*;

fn default_logging_level() -> LevelFilter {
    LevelFilter::Info
}

fn default_endpoint() -> String {
    "upload".to_string()
}

fn default_vus() -> usize {
    100
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "default_logging_level")]
    logging: LevelFilter,
    #[serde(default = "default_endpoint")]
    endpoint: String,
    #[serde(default = "default_vus")]
    vus: usize,
}

impl Default for General {
    fn default() -> General {
        General {
            logging: default_logging_level(),
            endpoint: default_endpoint(),
            vus: default_vus(),
        }
    }
}

impl General {
    pub fn logging(&self) -> LevelFilter {
        self.logging
    }

    pub fn set_logging(&mut self, level: LevelFilter) {
        self.logging = level;
    }

    /// the api endpoint under test, eg: `upload` for `/api/upload`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn set_endpoint(&mut self, endpoint: String) {
        self.endpoint = endpoint;
    }

    /// peak virtual users of the k6 scenario, shown in the chart title
    pub fn vus(&self) -> usize {
        self.vus
    }
}
