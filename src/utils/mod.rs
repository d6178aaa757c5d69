//! Shared utilities: time formatting and parameter validation.

pub mod duration;
pub mod validation;

pub use duration::{format_latency, format_time, TIMEBASE};
pub use validation::{validate, ValidationFailure, Violation, MAX_LP_COUNT};
