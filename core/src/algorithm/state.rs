//! Immutable network snapshots
//!
//! A snapshot freezes the capacity and flow of every edge at one point in
//! time. Exports render from snapshots, never from the live network, so the
//! rendered text always describes a single consistent state.

use serde::{Serialize, Deserialize};

use crate::algorithm::graph::max_flow::{FlowEdge, FlowNetwork};
use crate::algorithm::traits::{Capacity, FlowResult, NodeId};
use crate::config::validate_graph_name;

/// Point-in-time copy of a flow network's edges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Graph identifier used by renderers
    pub name: String,

    /// Vertex count of the captured network
    pub vertex_count: usize,

    /// Edges with positive capacity, ascending by `(from, to)`
    pub edges: Vec<FlowEdge>,
}

impl NetworkSnapshot {
    /// Captures the current state of `network` under `name`
    pub fn capture(network: &FlowNetwork, name: &str) -> FlowResult<Self> {
        validate_graph_name(name)?;
        Ok(Self {
            name: name.to_owned(),
            vertex_count: network.vertex_count(),
            edges: network.edges().collect(),
        })
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&FlowEdge> {
        self.edges
            .binary_search_by_key(&(from, to), |e| (e.from, e.to))
            .ok()
            .map(|index| &self.edges[index])
    }

    pub fn total_capacity(&self) -> Capacity {
        self.edges
            .iter()
            .map(|e| e.capacity)
            .fold(0, Capacity::saturating_add)
    }
}
