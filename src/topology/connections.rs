//! LP link generation.
//!
//! This file builds the link set for each topology kind. Construction is
//! deterministic: edges are emitted in a fixed order, so the edge index can
//! double as a progress counter.

use log::{debug, trace};

use crate::config::BenchmarkConfig;
use crate::topology::types::{Edge, LpId, PortId, Topology, TopologyKind};
use crate::utils::duration::format_latency;

/// Upper bound on the edge capacity reserved up front
const MAX_RESERVED_EDGES: u64 = 1 << 20;

/// Prefix of every LP port name
pub const PORT_PREFIX: &str = "port_";

/// Port on `this` LP used for the link to `other`.
///
/// The port name only encodes the peer index, so ports are unique per LP and
/// identical across runs.
///
/// # Examples
/// ```
/// use pholdsim::topology::port;
///
/// assert_eq!(port(0, 3).as_str(), "port_3");
/// assert_eq!(port(3, 0).as_str(), "port_0");
/// ```
pub fn port(_this: LpId, other: LpId) -> PortId {
    PortId(format!("{}{}", PORT_PREFIX, other))
}

fn edge(a: LpId, b: LpId, latency: &str) -> Edge {
    Edge {
        node_a: a,
        port_a: port(a, b),
        node_b: b,
        port_b: port(b, a),
        latency: latency.to_string(),
    }
}

/// Build the LP interconnection graph
///
/// # Arguments
/// * `lp_count` - Number of LPs; callers guarantee at least 2
/// * `kind` - Complete graph or ring
/// * `latency` - Latency string shared by every link
///
/// # Returns
/// The topology, with edges in emission order:
/// - Complete: `(i, j)` for every `i < j`, `i` ascending then `j` ascending
/// - Ring: `(i, (i+1) mod n)` for every `i`; a 2-LP ring has a single link
pub fn build(lp_count: u64, kind: TopologyKind, latency: &str) -> Topology {
    let nodes: Vec<LpId> = (0..lp_count).collect();
    let reserved = Topology::expected_edge_count(lp_count, kind).min(MAX_RESERVED_EDGES);
    let mut edges = Vec::with_capacity(reserved as usize);

    match kind {
        TopologyKind::Complete => {
            for i in 0..lp_count {
                for j in (i + 1)..lp_count {
                    trace!("  Creating link {}_{}", i, j);
                    edges.push(edge(i, j, latency));
                }
            }
        }
        TopologyKind::Ring => {
            for i in 0..lp_count {
                let next = (i + 1) % lp_count;
                // With two LPs the wrap-around link is the same pair again
                if lp_count == 2 && i == 1 {
                    continue;
                }
                trace!("  Creating link {}_{}", i, next);
                edges.push(edge(i, next, latency));
            }
        }
    }

    debug!("Built {} topology: {} LPs, {} links", kind, lp_count, edges.len());

    Topology { kind, nodes, edges }
}

impl Topology {
    /// Build the topology for a validated configuration.
    ///
    /// Link latency is the configured minimum delay.
    pub fn for_config(config: &BenchmarkConfig, kind: TopologyKind) -> Topology {
        let latency = format_latency(config.minimum(), config.timebase());
        build(config.number(), kind, &latency)
    }
}
