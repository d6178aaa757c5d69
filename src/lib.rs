//! # PholdSim - Configuration utility for PHOLD benchmark studies in SST
//!
//! This library validates PHOLD benchmark parameters, builds the logical
//! process (LP) interconnection topology, derives the statistics the engine
//! should collect, and generates parameter sweeps for batch studies.
//!
//! ## Overview
//!
//! PHOLD is a synthetic parallel discrete-event simulation benchmark: LPs
//! exchange time-stamped events over a fixed topology. The simulation itself
//! runs in an external engine (SST). PholdSim only produces the static
//! configuration the engine consumes.
//!
//! ## Architecture
//!
//! - `config`: raw and validated benchmark parameters
//! - `config_loader`: YAML loading and command line overrides
//! - `utils`: parameter validation and time formatting
//! - `topology`: complete-graph and ring LP topologies with port assignment
//! - `stats`: statistic counters, collection rate and delay histogram
//! - `sweep`: cartesian-product parameter sweeps and study parameter sets
//! - `backend`: the engine capability, plan recording and engine detection
//! - `orchestrator`: drives one experiment through a backend
//!
//! ## Example Usage
//!
//! ```rust
//! use pholdsim::config::RawBenchmarkArgs;
//! use pholdsim::orchestrator::build_plan;
//! use pholdsim::topology::TopologyKind;
//! use pholdsim::utils::validation::validate;
//!
//! let raw = RawBenchmarkArgs { number: 4.0, ..Default::default() };
//! let config = validate(&raw)?;
//!
//! let plan = build_plan(&config, TopologyKind::Complete)?;
//! assert_eq!(plan.components.len(), 4);
//! assert_eq!(plan.links.len(), 6);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library modules return typed errors built with `thiserror`. The binaries
//! use `color_eyre` for reporting with context.

pub mod config;
pub mod config_loader;
pub mod utils;
pub mod topology;
pub mod stats;
pub mod sweep;
pub mod backend;
pub mod orchestrator;

/// Exit status when the benchmark parameters are invalid
pub const EXIT_INVALID_CONFIG: i32 = 1;

/// Exit status when the simulation engine cannot be found
pub const EXIT_ENGINE_UNAVAILABLE: i32 = 3;

/// Default log filter for a script verbosity count
///
/// `0` logs at `info`, `1` at `debug`, `2` and above at `trace`.
pub fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
