//! Topology type definitions.
//!
//! This file contains the LP interconnection graph types: the topology
//! kinds supported (complete graph, ring), edges with their per-endpoint
//! ports, and the built [`Topology`] itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a logical process (LP)
pub type LpId = u64;

/// Shape of the LP interconnection graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TopologyKind {
    /// Every LP is linked to every other LP
    #[default]
    Complete,
    /// Each LP is linked to its successor, the last one back to the first
    Ring,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyKind::Complete => write!(f, "complete"),
            TopologyKind::Ring => write!(f, "ring"),
        }
    }
}

/// Port identifier on an LP. The port encodes the LP on the other side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortId(pub String);

impl PortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An undirected link between two LPs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub node_a: LpId,
    pub port_a: PortId,
    pub node_b: LpId,
    pub port_b: PortId,
    /// Link latency, e.g. `"1 s"`
    pub latency: String,
}

impl Edge {
    /// Engine link name, `"<a>_<b>"`
    pub fn link_name(&self) -> String {
        format!("{}_{}", self.node_a, self.node_b)
    }

    /// Returns true if this edge joins `x` and `y`, in either direction
    pub fn joins(&self, x: LpId, y: LpId) -> bool {
        (self.node_a == x && self.node_b == y) || (self.node_a == y && self.node_b == x)
    }
}

/// A built LP interconnection graph. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    pub kind: TopologyKind,
    pub nodes: Vec<LpId>,
    /// Edges in emission order
    pub edges: Vec<Edge>,
}

impl Topology {
    /// Number of LPs
    pub fn lp_count(&self) -> u64 {
        self.nodes.len() as u64
    }

    /// Number of edges `build` emits for `lp_count` LPs of the given kind.
    /// Saturates at `u64::MAX` for counts whose complete graph does not fit.
    pub fn expected_edge_count(lp_count: u64, kind: TopologyKind) -> u64 {
        match kind {
            TopologyKind::Complete => lp_count
                .checked_mul(lp_count.saturating_sub(1))
                .map_or(u64::MAX, |pairs| pairs / 2),
            TopologyKind::Ring if lp_count == 2 => 1,
            TopologyKind::Ring => lp_count,
        }
    }

    /// Ports attached to `node`, in edge order
    pub fn ports_of(&self, node: LpId) -> Vec<&PortId> {
        self.edges
            .iter()
            .filter_map(|e| {
                if e.node_a == node {
                    Some(&e.port_a)
                } else if e.node_b == node {
                    Some(&e.port_b)
                } else {
                    None
                }
            })
            .collect()
    }
}
