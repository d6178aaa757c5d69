//! Simulation engine backend module.
//!
//! The engine that actually runs PHOLD is external. This module defines the
//! capability the configuration logic drives ([`SimulationBackend`]), a
//! backend that records every call into a serializable [`EnginePlan`], and
//! detection of the engine installation.

pub mod engine;
pub mod recording;

use std::collections::BTreeMap;

use crate::config::ParamValue;
use crate::topology::PortId;

pub use engine::{locate_engine, ENGINE_BINARY, ENGINE_ENV_VAR};
pub use recording::{EnginePlan, RecordingBackend};

/// One side of an engine link
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Endpoint {
    /// Component name
    pub component: String,
    pub port: PortId,
    pub latency: String,
}

/// Errors reported by a simulation backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Simulation engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    #[error("Component already exists: {name}")]
    DuplicateComponent { name: String },

    #[error("Link {link} refers to unknown component: {component}")]
    UnknownComponent { link: String, component: String },

    #[error("Port {port} on component {component} is already connected")]
    PortInUse { component: String, port: PortId },

    #[error("Link already exists: {name}")]
    DuplicateLink { name: String },
}

/// The engine operations needed to set up one PHOLD experiment
pub trait SimulationBackend {
    /// Create a named component of the given type with its parameters
    fn create_component(
        &mut self,
        name: &str,
        component_type: &str,
        params: &BTreeMap<String, ParamValue>,
    ) -> Result<(), BackendError>;

    /// Create a named link joining two component ports
    fn connect(&mut self, link: &str, a: Endpoint, b: Endpoint) -> Result<(), BackendError>;

    fn set_statistic_load_level(&mut self, level: u8) -> Result<(), BackendError>;

    fn set_statistic_output(&mut self, output: &str) -> Result<(), BackendError>;

    /// Enable the named statistics on every component of a type
    fn enable_statistics_for_component_type(
        &mut self,
        component_type: &str,
        statistics: &[&str],
        params: &BTreeMap<String, String>,
    ) -> Result<(), BackendError>;
}
