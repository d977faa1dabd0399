//! Core trait definitions for the FlowNet maximum flow engine
//!
//! This module establishes the vocabulary shared by every flow algorithm:
//! vertex identifiers, integral capacity and flow types, the error taxonomy,
//! the solver trait and the run metrics collected while a solver executes.
//!
//! # Error Taxonomy
//! Every failure is either an *invalid argument* (bad vertex index, negative
//! capacity, `source == sink`, malformed parameter) or an *I/O failure*
//! while exporting. Both are reported at the offending call; nothing is
//! retried or partially applied.

use std::fmt::Debug;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use serde::{Serialize, Deserialize};

use crate::algorithm::graph::max_flow::{FlowNetwork, MaxFlowResult};

/// Vertex identifier, an index in `[0, vertex_count)`
pub type NodeId = usize;

/// Edge capacity type. Signed so that negative input can be rejected
/// instead of wrapping.
pub type Capacity = i64;

/// Flow value type. Antisymmetric: `flow(u, v) == -flow(v, u)`.
pub type Flow = i64;

/// Convenience alias used across the crate
pub type FlowResult<T> = Result<T, FlowError>;

/// Comprehensive error types for flow network operations
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid vertex {vertex}: network has {vertex_count} vertices")]
    InvalidVertex { vertex: NodeId, vertex_count: usize },

    #[error("Negative capacity {capacity} on edge {from} -> {to}")]
    NegativeCapacity { from: NodeId, to: NodeId, capacity: Capacity },

    #[error("Source and sink must differ (both are {0})")]
    SourceEqualsSink(NodeId),

    #[error("A flow network needs at least one vertex")]
    EmptyNetwork,

    #[error("Capacity overflow while adding edge {from} -> {to}")]
    CapacityOverflow { from: NodeId, to: NodeId },

    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to export network to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write network export: {0}")]
    Write(#[from] std::io::Error),
}

impl FlowError {
    /// True for every rejection of caller-supplied input
    pub fn is_invalid_argument(&self) -> bool {
        !self.is_io()
    }

    /// True when the export destination could not be opened or written
    pub fn is_io(&self) -> bool {
        matches!(self, FlowError::Io { .. } | FlowError::Write(_))
    }

    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        FlowError::InvalidParameter {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Asymptotic complexity information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmComplexity {
    pub time_complexity: String,
    pub space_complexity: String,
}

/// Run metrics collected by a solver
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmentations: usize,
    /// Number of vertices dequeued across all breadth-first searches
    pub vertices_scanned: usize,
    /// Wall-clock time spent inside the solver
    pub execution_time_ms: f64,
}

/// Maximum flow solver trait
///
/// # Invariants
/// - Capacities are never mutated by a solver
/// - Flow stays antisymmetric after every augmentation
/// - A solver always terminates on integral capacities
pub trait MaxFlowAlgorithm: Debug {
    /// Returns the algorithm's descriptive name
    fn name(&self) -> &'static str;

    /// Returns the algorithm's category
    fn category(&self) -> &'static str {
        "max_flow"
    }

    /// Returns a short description of the algorithm
    fn description(&self) -> String;

    /// Returns the algorithm's asymptotic complexity in Big-O notation
    fn complexity(&self) -> AlgorithmComplexity;

    /// Sets a solver parameter from its textual form
    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()>;

    /// Gets a solver parameter in its textual form
    fn get_parameter(&self, name: &str) -> Option<String>;

    /// Saturates `network` from `source` to `sink`
    fn solve(
        &mut self,
        network: &mut FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> FlowResult<MaxFlowResult>;
}

/// Collects [`FlowMetrics`] while a solver runs
#[derive(Debug, Default)]
pub struct AlgorithmProfiler {
    metrics: FlowMetrics,
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl AlgorithmProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
            self.metrics.execution_time_ms = self.elapsed.as_secs_f64() * 1000.0;
        }
    }

    #[inline]
    pub fn record_augmentation(&mut self) {
        self.metrics.augmentations += 1;
    }

    #[inline]
    pub fn record_scan(&mut self) {
        self.metrics.vertices_scanned += 1;
    }

    pub fn get_metrics(&self) -> FlowMetrics {
        self.metrics.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let invalid = FlowError::InvalidVertex { vertex: 7, vertex_count: 3 };
        assert!(invalid.is_invalid_argument());
        assert!(!invalid.is_io());

        let io = FlowError::Io {
            path: PathBuf::from("/nowhere/graph.dot"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(io.is_io());
        assert!(!io.is_invalid_argument());

        let config = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(FlowError::from(config).is_invalid_argument());
    }

    #[test]
    fn test_error_messages() {
        let err = FlowError::NegativeCapacity { from: 1, to: 2, capacity: -4 };
        assert_eq!(err.to_string(), "Negative capacity -4 on edge 1 -> 2");

        let err = FlowError::SourceEqualsSink(3);
        assert_eq!(err.to_string(), "Source and sink must differ (both are 3)");
    }

    #[test]
    fn test_profiler_counts() {
        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        profiler.record_augmentation();
        profiler.record_scan();
        profiler.record_scan();
        profiler.stop();

        let metrics = profiler.get_metrics();
        assert_eq!(metrics.augmentations, 1);
        assert_eq!(metrics.vertices_scanned, 2);
        assert!(metrics.execution_time_ms >= 0.0);
    }
}
