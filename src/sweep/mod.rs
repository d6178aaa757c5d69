//! Parameter sweep module.
//!
//! This module generates the cartesian product of sweep axes and the
//! labeled parameter sets a batch workflow tool submits, one run per
//! combination.

pub mod generator;
pub mod study;

pub use generator::{
    exp_count_axis, exp_event_axis, generate, instance_count, SweepAxis, SweepInstance,
};
pub use study::{get_custom_generator, load_study, parse_overrides, ParameterSet, StudyEnvironment};

/// Errors that can occur while building a sweep
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Study variable not found: {0}")]
    MissingVariable(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("Malformed override '{0}', expected NAME:value")]
    MalformedOverride(String),

    #[error("Exponent {exponent} for {name} does not fit in 64 bits")]
    ExponentOverflow { name: String, exponent: i64 },

    #[error("Failed to read study file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse study file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
