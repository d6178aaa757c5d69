use crate::config::RawBenchmarkArgs;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::fs::File;
use std::path::Path;

/// Load raw benchmark parameters from a YAML file.
///
/// Fields missing from the file keep their defaults. The result is not
/// validated; pass it through [`validate`](crate::utils::validation::validate).
pub fn load_config(config_path: &Path) -> Result<RawBenchmarkArgs> {
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    let raw: RawBenchmarkArgs = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    Ok(raw)
}

/// Command line values that override file or default settings
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub remote: Option<f64>,
    pub minimum: Option<f64>,
    pub average: Option<f64>,
    pub stop: Option<f64>,
    pub number: Option<f64>,
    pub events: Option<f64>,
    pub delays: bool,
    pub pverbose: u8,
    pub py_verbose: u8,
}

/// Apply command line overrides on top of raw parameters.
///
/// Flags only turn `delays` on, and verbosity counts add to the file values.
pub fn apply_overrides(raw: &mut RawBenchmarkArgs, overrides: &CliOverrides) {
    if let Some(remote) = overrides.remote {
        raw.remote = remote;
    }
    if let Some(minimum) = overrides.minimum {
        raw.minimum = minimum;
    }
    if let Some(average) = overrides.average {
        raw.average = average;
    }
    if let Some(stop) = overrides.stop {
        raw.stop = stop;
    }
    if let Some(number) = overrides.number {
        raw.number = number;
    }
    if let Some(events) = overrides.events {
        raw.events = events;
    }
    raw.delays |= overrides.delays;
    raw.pverbose = raw.pverbose.saturating_add(overrides.pverbose);
    raw.py_verbose = raw.py_verbose.saturating_add(overrides.py_verbose);
}
