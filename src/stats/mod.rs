//! Statistics module.
//!
//! This module derives the measurement configuration (counters, collection
//! rate, cut-off time, delay histogram) from a validated benchmark.

pub mod plan;

pub use plan::{derive, CounterConfig, HistogramShape, StatConfig, PHOLD_COMPONENT};
