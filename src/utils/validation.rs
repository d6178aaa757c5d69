//! Benchmark parameter validation.
//!
//! This module checks raw benchmark parameters against their bounds and
//! produces a [`BenchmarkConfig`] only when every check passes. All
//! violations are collected and reported together.

use crate::config::{BenchmarkConfig, RawBenchmarkArgs};
use std::fmt;

/// Largest accepted LP count. Keeps the complete-graph link count within `u64`.
pub const MAX_LP_COUNT: u64 = u32::MAX as u64;

/// A single violated parameter bound
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    #[error("Invalid remote fraction: {0}, must be in [0,1]")]
    RemoteFraction(f64),

    #[error("Invalid minimum delay: {0}, must be > 0")]
    MinimumDelay(f64),

    #[error("Invalid average delay: {0}, must be >= 0")]
    AverageDelay(f64),

    #[error("Invalid stop time: {0}, must be >= 0")]
    StopTime(f64),

    #[error("Invalid number: {0}, need at least 2")]
    LpCount(i64),

    #[error("Invalid number: {0}, at most {} LPs supported", MAX_LP_COUNT)]
    LpCountTooLarge(i64),

    #[error("Invalid initial events: {0}, need at least 1")]
    InitialEvents(i64),
}

/// Validation failed; holds every violated rule in check order
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "Invalid benchmark configuration: {}", messages.join("; "))
    }
}

impl std::error::Error for ValidationFailure {}

/// Truncate a floating count toward zero, saturating at the `i64` range.
/// NaN becomes 0.
fn truncate_count(value: f64) -> i64 {
    value.trunc() as i64
}

/// Validate raw benchmark parameters
///
/// Checks, independently of each other:
/// - `remote` is in `[0,1]`
/// - `minimum` is finite and `> 0`
/// - `average` is finite and `>= 0`
/// - `stop` is finite and `>= 0`
/// - `number`, truncated toward zero, is in `[2, MAX_LP_COUNT]`
/// - `events`, truncated toward zero, is at least 1
///
/// Each violation is logged as an error message.
///
/// # Returns
/// * `Ok(BenchmarkConfig)` if every check passes
/// * `Err(ValidationFailure)` listing all violations otherwise
///
/// # Examples
/// ```
/// use pholdsim::config::RawBenchmarkArgs;
/// use pholdsim::utils::validation::validate;
///
/// assert!(validate(&RawBenchmarkArgs::default()).is_ok());
///
/// let raw = RawBenchmarkArgs { remote: 1.1, number: 1.0, ..Default::default() };
/// let failure = validate(&raw).unwrap_err();
/// assert_eq!(failure.violations.len(), 2);
/// ```
pub fn validate(raw: &RawBenchmarkArgs) -> Result<BenchmarkConfig, ValidationFailure> {
    let mut violations = Vec::new();

    if !(0.0..=1.0).contains(&raw.remote) {
        violations.push(Violation::RemoteFraction(raw.remote));
    }
    if !(raw.minimum.is_finite() && raw.minimum > 0.0) {
        violations.push(Violation::MinimumDelay(raw.minimum));
    }
    if !(raw.average.is_finite() && raw.average >= 0.0) {
        violations.push(Violation::AverageDelay(raw.average));
    }
    if !(raw.stop.is_finite() && raw.stop >= 0.0) {
        violations.push(Violation::StopTime(raw.stop));
    }

    let number = truncate_count(raw.number);
    if number < 2 {
        violations.push(Violation::LpCount(number));
    } else if number as u64 > MAX_LP_COUNT {
        violations.push(Violation::LpCountTooLarge(number));
    }

    let events = truncate_count(raw.events);
    if events < 1 {
        violations.push(Violation::InitialEvents(events));
    }

    if !violations.is_empty() {
        for violation in &violations {
            log::error!("{}", violation);
        }
        return Err(ValidationFailure { violations });
    }

    Ok(BenchmarkConfig {
        remote: raw.remote,
        minimum: raw.minimum,
        average: raw.average,
        stop: raw.stop,
        number: number as u64,
        events: events as u64,
        delays: raw.delays,
        pverbose: raw.pverbose,
        py_verbose: raw.py_verbose,
    })
}
