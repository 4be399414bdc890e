// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate log;

use k6_analysis::{Config, Error, SimpleLogger, NAME, VERSION};

use std::process;

fn main() {
    let config = match Config::from_args(std::env::args_os()) {
        Ok(config) => config,
        Err(Error::Usage(usage)) => {
            println!("{}", usage);
            process::exit(1);
        }
        Err(e) => {
            println!("ERROR: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = SimpleLogger::new(config.logging()).init() {
        println!("ERROR: failed to initialize logger: {}", e);
        process::exit(1);
    }

    info!("{} {} initializing...", NAME, VERSION);

    if let Err(e) = k6_analysis::run(&config) {
        error!("{}", e);
        process::exit(1);
    }
}
