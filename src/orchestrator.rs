//! Experiment orchestrator.
//!
//! This module coordinates one PHOLD experiment instantiation: it builds the
//! topology and statistics plan from a validated configuration and drives a
//! [`SimulationBackend`] through component creation, link creation and
//! statistics setup.

use log::{debug, info, trace};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::backend::{BackendError, EnginePlan, Endpoint, RecordingBackend, SimulationBackend};
use crate::config::BenchmarkConfig;
use crate::stats::{self, StatConfig, PHOLD_COMPONENT};
use crate::topology::{Topology, TopologyKind};

/// Counts of what was configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentSummary {
    pub components: u64,
    pub links: u64,
    pub statistic_load_level: u8,
    pub counters: usize,
}

/// Component name of an LP
pub fn component_name(lp: u64) -> String {
    lp.to_string()
}

/// Configure one experiment on a backend
///
/// # Arguments
/// * `config` - Validated benchmark configuration
/// * `kind` - LP interconnection topology
/// * `backend` - Engine capability receiving the calls
pub fn configure_experiment(
    config: &BenchmarkConfig,
    kind: TopologyKind,
    backend: &mut dyn SimulationBackend,
) -> Result<ExperimentSummary, BackendError> {
    info!("Creating {} LPs", config.number());
    let params = config.engine_params();
    for lp in 0..config.number() {
        debug!("  Creating LP {}", lp);
        backend.create_component(&component_name(lp), PHOLD_COMPONENT, &params)?;
    }

    let topology = Topology::for_config(config, kind);
    let latency = topology.edges.first().map(|e| e.latency.clone()).unwrap_or_default();
    info!(
        "Creating {} graph with latency {} ({} total)",
        kind,
        latency,
        topology.edges.len()
    );
    for edge in &topology.edges {
        let link = edge.link_name();
        trace!("  Creating link {}", link);
        let a = Endpoint {
            component: component_name(edge.node_a),
            port: edge.port_a.clone(),
            latency: edge.latency.clone(),
        };
        let b = Endpoint {
            component: component_name(edge.node_b),
            port: edge.port_b.clone(),
            latency: edge.latency.clone(),
        };
        trace!("    connecting {:?} to {:?}", a, b);
        backend.connect(&link, a, b)?;
    }

    let stat_config = stats::derive(config);
    apply_statistics(&stat_config, backend)?;

    Ok(ExperimentSummary {
        components: config.number(),
        links: topology.edges.len() as u64,
        statistic_load_level: stat_config.load_level,
        counters: stat_config.counters.len(),
    })
}

/// Apply a statistics plan to a backend, one counter at a time
pub fn apply_statistics(
    stat_config: &StatConfig,
    backend: &mut dyn SimulationBackend,
) -> Result<(), BackendError> {
    info!("Enabling statistics at level {}", stat_config.load_level);
    backend.set_statistic_load_level(stat_config.load_level)?;
    backend.set_statistic_output(&stat_config.output)?;

    for (name, counter) in &stat_config.counters {
        let params = counter.engine_params();
        debug!("  {} config: {:?}", name, params);
        backend.enable_statistics_for_component_type(
            &stat_config.component_type,
            &[name.as_str()],
            &params,
        )?;
    }
    Ok(())
}

/// Record a complete experiment into an engine plan
pub fn build_plan(config: &BenchmarkConfig, kind: TopologyKind) -> Result<EnginePlan, BackendError> {
    let mut backend = RecordingBackend::new();
    configure_experiment(config, kind, &mut backend)?;
    Ok(backend.into_plan())
}

/// Write an engine plan as pretty-printed JSON, creating parent directories
pub fn write_plan(plan: &EnginePlan, output_path: &Path) -> color_eyre::eyre::Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                color_eyre::eyre::eyre!("Failed to create directory '{}': {}", parent.display(), e)
            })?;
        }
    }
    let json = serde_json::to_string_pretty(plan)?;
    fs::write(output_path, json)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write plan '{}': {}", output_path.display(), e))?;
    info!("Wrote engine plan to {:?}", output_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ParamValue, RawBenchmarkArgs};
    use crate::utils::validation::validate;
    use tempfile::TempDir;

    fn config_with(f: impl FnOnce(&mut RawBenchmarkArgs)) -> BenchmarkConfig {
        let mut raw = RawBenchmarkArgs::default();
        f(&mut raw);
        validate(&raw).unwrap()
    }

    #[test]
    fn test_complete_experiment() {
        let config = config_with(|r| r.number = 6.0);
        let mut backend = RecordingBackend::new();
        let summary = configure_experiment(&config, TopologyKind::Complete, &mut backend).unwrap();

        assert_eq!(summary.components, 6);
        assert_eq!(summary.links, 15);
        assert_eq!(summary.statistic_load_level, 1);
        assert_eq!(summary.counters, 2);

        let plan = backend.into_plan();
        assert_eq!(plan.components.len(), 6);
        assert_eq!(plan.links.len(), 15);
        let lp = plan.component("3").unwrap();
        assert_eq!(lp.component_type, "phold.Phold");
        assert_eq!(lp.params["number"], ParamValue::Int(6));

        let link = plan.link("2_5").unwrap();
        assert_eq!(link.endpoints[0].component, "2");
        assert_eq!(link.endpoints[0].port.as_str(), "port_5");
        assert_eq!(link.endpoints[1].port.as_str(), "port_2");
        assert_eq!(link.endpoints[0].latency, "1 s");
    }

    #[test]
    fn test_ring_experiment() {
        let config = config_with(|r| r.number = 5.0);
        let plan = build_plan(&config, TopologyKind::Ring).unwrap();
        assert_eq!(plan.links.len(), 5);
        assert!(plan.link("4_0").is_some());
        assert!(plan.link("0_2").is_none());
    }

    #[test]
    fn test_statistics_applied() {
        let config = config_with(|r| r.delays = true);
        let plan = build_plan(&config, TopologyKind::Complete).unwrap();
        assert_eq!(plan.statistic_load_level, Some(2));
        assert_eq!(plan.statistic_output.as_deref(), Some("sst.statOutputConsole"));
        assert_eq!(plan.statistics.len(), 3);

        let delays = plan
            .statistics
            .iter()
            .find(|s| s.statistics == vec!["Delays".to_string()])
            .unwrap();
        assert_eq!(delays.component_type, "phold.Phold");
        assert_eq!(delays.params["binwidth"], "1");
        assert_eq!(delays.params["stopat"], "10s");
    }

    #[test]
    fn test_write_plan() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("phold_plan.json");
        let plan = build_plan(&config_with(|_| {}), TopologyKind::Complete).unwrap();
        write_plan(&plan, &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["components"].as_array().unwrap().len(), 2);
        assert_eq!(json["links"][0]["name"], "0_1");
        assert_eq!(json["components"][0]["type"], "phold.Phold");
        assert_eq!(json["components"][0]["params"]["TIMEBASE"], "s");
    }
}
