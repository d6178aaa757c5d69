//! LP interconnection topology module.
//!
//! This module builds the links between logical processes and assigns the
//! port on each end of every link.

pub mod types;
pub mod connections;

// Re-export key types and functions for easier access
pub use types::{Edge, LpId, PortId, Topology, TopologyKind};
pub use connections::{build, port, PORT_PREFIX};
