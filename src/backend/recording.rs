//! Recording backend.
//!
//! Captures every engine call into an [`EnginePlan`] that can be written
//! out as JSON and replayed by an engine driver. The same structural checks
//! the engine performs (unique component names, one link per port) are
//! applied while recording.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::backend::{BackendError, Endpoint, SimulationBackend};
use crate::config::ParamValue;
use crate::topology::PortId;

/// A component instance in the plan
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub params: BTreeMap<String, ParamValue>,
}

/// A link between two component ports
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanLink {
    pub name: String,
    pub endpoints: [Endpoint; 2],
}

/// Statistics enabled on a component type
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PlanStatistic {
    pub component_type: String,
    pub statistics: Vec<String>,
    pub params: BTreeMap<String, String>,
}

/// Everything an engine needs to instantiate one experiment
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct EnginePlan {
    pub components: Vec<PlanComponent>,
    pub links: Vec<PlanLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_load_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic_output: Option<String>,
    pub statistics: Vec<PlanStatistic>,
}

impl EnginePlan {
    pub fn component(&self, name: &str) -> Option<&PlanComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    pub fn link(&self, name: &str) -> Option<&PlanLink> {
        self.links.iter().find(|l| l.name == name)
    }
}

/// Backend that records calls into an [`EnginePlan`]
#[derive(Debug, Default)]
pub struct RecordingBackend {
    plan: EnginePlan,
    component_names: BTreeSet<String>,
    link_names: BTreeSet<String>,
    used_ports: BTreeSet<(String, PortId)>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> &EnginePlan {
        &self.plan
    }

    pub fn into_plan(self) -> EnginePlan {
        self.plan
    }

    fn claim_port(&mut self, link: &str, endpoint: &Endpoint) -> Result<(), BackendError> {
        if !self.component_names.contains(&endpoint.component) {
            return Err(BackendError::UnknownComponent {
                link: link.to_string(),
                component: endpoint.component.clone(),
            });
        }
        let key = (endpoint.component.clone(), endpoint.port.clone());
        if self.used_ports.contains(&key) {
            return Err(BackendError::PortInUse {
                component: endpoint.component.clone(),
                port: endpoint.port.clone(),
            });
        }
        Ok(())
    }
}

impl SimulationBackend for RecordingBackend {
    fn create_component(
        &mut self,
        name: &str,
        component_type: &str,
        params: &BTreeMap<String, ParamValue>,
    ) -> Result<(), BackendError> {
        if !self.component_names.insert(name.to_string()) {
            return Err(BackendError::DuplicateComponent { name: name.to_string() });
        }
        self.plan.components.push(PlanComponent {
            name: name.to_string(),
            component_type: component_type.to_string(),
            params: params.clone(),
        });
        Ok(())
    }

    fn connect(&mut self, link: &str, a: Endpoint, b: Endpoint) -> Result<(), BackendError> {
        if self.link_names.contains(link) {
            return Err(BackendError::DuplicateLink { name: link.to_string() });
        }
        self.claim_port(link, &a)?;
        self.claim_port(link, &b)?;
        if a.component == b.component && a.port == b.port {
            return Err(BackendError::PortInUse {
                component: a.component,
                port: a.port,
            });
        }

        self.used_ports.insert((a.component.clone(), a.port.clone()));
        self.used_ports.insert((b.component.clone(), b.port.clone()));
        self.link_names.insert(link.to_string());
        self.plan.links.push(PlanLink {
            name: link.to_string(),
            endpoints: [a, b],
        });
        Ok(())
    }

    fn set_statistic_load_level(&mut self, level: u8) -> Result<(), BackendError> {
        self.plan.statistic_load_level = Some(level);
        Ok(())
    }

    fn set_statistic_output(&mut self, output: &str) -> Result<(), BackendError> {
        self.plan.statistic_output = Some(output.to_string());
        Ok(())
    }

    fn enable_statistics_for_component_type(
        &mut self,
        component_type: &str,
        statistics: &[&str],
        params: &BTreeMap<String, String>,
    ) -> Result<(), BackendError> {
        self.plan.statistics.push(PlanStatistic {
            component_type: component_type.to_string(),
            statistics: statistics.iter().map(|s| s.to_string()).collect(),
            params: params.clone(),
        });
        Ok(())
    }
}
