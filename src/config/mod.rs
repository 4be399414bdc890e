// Copyright 2022 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod general;
mod phases;

pub use self::general::General;
pub use self::phases::*;

use crate::{Error, Result};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{App, Arg, ArgMatches, ErrorKind};
use log::LevelFilter;
use serde_derive::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

fn default_input_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_latency_metric() -> String {
    "http_req_duration".to_string()
}

fn default_failure_metric() -> String {
    "http_req_failed".to_string()
}

fn default_width() -> u32 {
    1300
}

fn default_height() -> u32 {
    800
}

fn default_chart_share() -> f64 {
    0.75
}

fn default_bin() -> f64 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    #[serde(default = "default_input_dir")]
    dir: PathBuf,
    #[serde(default = "default_latency_metric")]
    latency_metric: String,
    #[serde(default = "default_failure_metric")]
    failure_metric: String,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            latency_metric: default_latency_metric(),
            failure_metric: default_failure_metric(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default = "default_output_dir")]
    dir: PathBuf,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plot {
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_chart_share")]
    chart_share: f64,
    #[serde(default = "default_bin")]
    bin: f64,
}

impl Default for Plot {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            chart_share: default_chart_share(),
            bin: default_bin(),
        }
    }
}

impl Plot {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// fraction of the image height given to the latency chart, the
    /// summary table takes the rest
    pub fn chart_share(&self) -> f64 {
        self.chart_share
    }

    /// width in seconds of the elapsed-time buckets that runs are
    /// averaged over
    pub fn bin(&self) -> f64 {
        self.bin
    }
}

/// Contents of the optional TOML config file. Every section may be
/// omitted.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    general: General,
    #[serde(default)]
    input: Input,
    #[serde(default)]
    output: Output,
    #[serde(default)]
    phases: Phases,
    #[serde(default)]
    plot: Plot,
}

impl ConfigFile {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Everything a single invocation needs. Built once from defaults, the
/// config file and the command line, then passed to each stage.
#[derive(Clone, Debug)]
pub struct Config {
    platform_folder: String,
    general: General,
    input: Input,
    output: Output,
    phases: Phases,
    plot: Plot,
}

impl Config {
    /// builtin configuration for the given platform folder
    pub fn new(platform_folder: &str) -> Self {
        Self::with_file(platform_folder, ConfigFile::default())
    }

    pub fn with_file(platform_folder: &str, file: ConfigFile) -> Self {
        Self {
            platform_folder: platform_folder.to_string(),
            general: file.general,
            input: file.input,
            output: file.output,
            phases: file.phases,
            plot: file.plot,
        }
    }

    fn app() -> App<'static, 'static> {
        App::new(NAME)
            .version(VERSION)
            .about("Compare k6 latency exports between the Node.js and ASP.NET apis")
            .arg(
                Arg::with_name("platform-folder")
                    .value_name("PLATFORM_FOLDER")
                    .help("Test environment folder holding the run exports, eg: windows-server")
                    .index(1),
            )
            .arg(
                Arg::with_name("config")
                    .long("config")
                    .value_name("FILE")
                    .help("TOML config file")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("input")
                    .long("input")
                    .value_name("DIR")
                    .help("Base directory containing the platform folders")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("output")
                    .long("output")
                    .value_name("DIR")
                    .help("Base directory for the rendered chart")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("endpoint")
                    .long("endpoint")
                    .value_name("NAME")
                    .help("Endpoint under test, selects the run files and output name")
                    .takes_value(true),
            )
            .arg(
                Arg::with_name("verbose")
                    .short("v")
                    .long("verbose")
                    .help("Increase verbosity by one level. Can be used more than once")
                    .multiple(true),
            )
    }

    /// parse command line options and return `Config`
    pub fn from_args<I, T>(args: I) -> Result<Config>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match Self::app().get_matches_from_safe(args) {
            Ok(matches) => matches,
            Err(e) => match e.kind {
                ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => e.exit(),
                _ => return Err(Error::Usage(e.message)),
            },
        };

        let platform_folder = match matches.value_of("platform-folder") {
            Some(folder) => folder.to_string(),
            None => return Err(Error::Usage(usage(&matches))),
        };

        let file = if let Some(path) = matches.value_of("config") {
            ConfigFile::load_from_file(Path::new(path))?
        } else {
            ConfigFile::default()
        };

        let mut config = Config::with_file(&platform_folder, file);

        if let Some(input) = matches.value_of("input") {
            config.input.dir = PathBuf::from(input);
        }

        if let Some(output) = matches.value_of("output") {
            config.output.dir = PathBuf::from(output);
        }

        if let Some(endpoint) = matches.value_of("endpoint") {
            config.general.set_endpoint(endpoint.to_string());
        }

        let verbosity = matches.occurrences_of("verbose");
        if verbosity > 0 {
            config.general.set_logging(match verbosity {
                1 => LevelFilter::Debug,
                _ => LevelFilter::Trace,
            });
        }

        Ok(config)
    }

    pub fn set_input_dir(&mut self, dir: impl Into<PathBuf>) {
        self.input.dir = dir.into();
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output.dir = dir.into();
    }

    pub fn platform_folder(&self) -> &str {
        &self.platform_folder
    }

    pub fn logging(&self) -> LevelFilter {
        self.general.logging()
    }

    pub fn endpoint(&self) -> &str {
        self.general.endpoint()
    }

    pub fn vus(&self) -> usize {
        self.general.vus()
    }

    /// directory holding this platform folder's run exports
    pub fn run_dir(&self) -> PathBuf {
        self.input.dir.join(&self.platform_folder)
    }

    pub fn latency_metric(&self) -> &str {
        &self.input.latency_metric
    }

    pub fn failure_metric(&self) -> &str {
        &self.input.failure_metric
    }

    /// `<output>/<endpoint>/<folder>/<endpoint>-latency-detailed-<folder>.png`
    pub fn output_path(&self) -> PathBuf {
        let endpoint = self.endpoint();
        let folder = &self.platform_folder;
        self.output
            .dir
            .join(endpoint)
            .join(folder)
            .join(format!("{}-latency-detailed-{}.png", endpoint, folder))
    }

    pub fn phases(&self) -> &Phases {
        &self.phases
    }

    pub fn plot(&self) -> &Plot {
        &self.plot
    }

    pub fn print(&self) {
        info!("-----");
        info!("Config:");
        info!("Platform folder: {}", self.platform_folder);
        info!("Endpoint: /api/{}", self.endpoint());
        info!("Input: {}", self.run_dir().display());
        info!("Output: {}", self.output_path().display());
        info!(
            "Metrics: latency: {} failure: {}",
            self.latency_metric(),
            self.failure_metric()
        );
        info!("Phase boundaries: {:?}", self.phases.boundaries());
        info!("-----");
    }
}

fn usage(matches: &ArgMatches) -> String {
    format!("{}\n\nExample: {} windows-server", matches.usage(), NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_folder_is_usage_error() {
        match Config::from_args(vec!["k6-analysis"]) {
            Err(Error::Usage(usage)) => {
                assert!(usage.contains(NAME));
                assert!(usage.contains("Example: k6-analysis windows-server"));
            }
            other => panic!("expected usage error, got: {:?}", other),
        }
    }

    #[test]
    fn defaults() {
        let config = Config::from_args(vec!["k6-analysis", "windows-server"]).unwrap();
        assert_eq!(config.platform_folder(), "windows-server");
        assert_eq!(config.endpoint(), "upload");
        assert_eq!(config.logging(), LevelFilter::Info);
        assert_eq!(config.latency_metric(), "http_req_duration");
        assert_eq!(config.failure_metric(), "http_req_failed");
        assert_eq!(config.run_dir(), PathBuf::from("./windows-server"));
        assert_eq!(
            config.output_path(),
            PathBuf::from("results/upload/windows-server/upload-latency-detailed-windows-server.png")
        );
        assert_eq!(config.phases(), &Phases::default());
        assert_eq!(config.plot().size(), (1300, 800));
    }

    #[test]
    fn overrides() {
        let config = Config::from_args(vec![
            "k6-analysis",
            "--input",
            "k6/results",
            "--output",
            "/tmp/out",
            "--endpoint",
            "orders",
            "-vv",
            "linux",
        ])
        .unwrap();
        assert_eq!(config.logging(), LevelFilter::Trace);
        assert_eq!(config.run_dir(), PathBuf::from("k6/results/linux"));
        assert_eq!(
            config.output_path(),
            PathBuf::from("/tmp/out/orders/linux/orders-latency-detailed-linux.png")
        );
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        assert!(matches!(
            Config::from_args(vec!["k6-analysis", "--bogus", "linux"]),
            Err(Error::Usage(_))
        ));
    }

    #[test]
    fn config_file() {
        let file = ConfigFile::parse(
            Path::new("test.toml"),
            r#"
            [general]
            logging = "debug"
            endpoint = "login"
            vus = 50

            [input]
            latency_metric = "iteration_duration"

            [phases]
            boundaries = [60.0, 180.0]

            [plot]
            bin = 5.0
            "#,
        )
        .unwrap();
        let config = Config::with_file("mac", file);
        assert_eq!(config.logging(), LevelFilter::Debug);
        assert_eq!(config.endpoint(), "login");
        assert_eq!(config.vus(), 50);
        assert_eq!(config.latency_metric(), "iteration_duration");
        assert_eq!(config.failure_metric(), "http_req_failed");
        assert_eq!(config.phases().boundaries(), &[60.0, 180.0]);
        assert_eq!(config.plot().bin(), 5.0);
        assert_eq!(config.plot().size(), (1300, 800));
    }

    #[test]
    fn config_file_rejects_unknown_fields() {
        let result = ConfigFile::parse(Path::new("bad.toml"), "[general]\nthreads = 4\n");
        match result {
            Err(Error::Config { path, .. }) => assert_eq!(path, PathBuf::from("bad.toml")),
            other => panic!("expected config error, got: {:?}", other),
        }
    }
}
