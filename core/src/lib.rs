//! # FlowNet Core
//!
//! Maximum flow computation on dense, integer-capacitated directed networks.
//!
//! The crate is built around [`FlowNetwork`]: a fixed vertex count chosen at
//! construction, a capacity matrix filled during setup, and an antisymmetric
//! flow matrix advanced in place by the Edmonds-Karp computation.
//!
//! ```
//! use flownet_core::FlowNetwork;
//!
//! let mut network = FlowNetwork::new(4)?;
//! network.add_edge(0, 1, 3)?;
//! network.add_edge(0, 2, 2)?;
//! network.add_edge(1, 3, 2)?;
//! network.add_edge(2, 3, 3)?;
//!
//! assert_eq!(network.compute_max_flow(0, 3)?, 4);
//! assert!(network.to_dot("FlowNetwork")?.contains("0 -> 1 [label=\"2/3\"];"));
//! # Ok::<(), flownet_core::FlowError>(())
//! ```
//!
//! ## Modules
//!
//! - [`algorithm`]: the network, the [`EdmondsKarp`] solver, snapshots and errors.
//! - [`config`]: solver configuration and re-invocation policy.
//! - [`export`]: Graphviz DOT rendering and atomic file export.
//! - [`validation`]: invariant checks and exhaustive min-cut verification.
//!
//! The engine is single-threaded and holds no global state. A network is
//! not internally synchronised; callers sharing one across threads must
//! serialise access themselves.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod config;
pub mod export;
pub mod validation;

pub use algorithm::{
    Capacity, EdmondsKarp, Flow, FlowEdge, FlowError, FlowMetrics, FlowNetwork, FlowPath,
    FlowResult, MaxFlowAlgorithm, MaxFlowResult, MinCut, NetworkSnapshot, NodeId,
};
pub use config::{FlowConfig, InvocationMode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
