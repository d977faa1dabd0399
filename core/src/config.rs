//! Solver configuration
//!
//! Configuration is plain data: it can be built in code, deserialized from a
//! JSON document, or adjusted one parameter at a time through
//! [`MaxFlowAlgorithm::set_parameter`](crate::algorithm::MaxFlowAlgorithm::set_parameter).

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

use crate::algorithm::traits::{FlowError, FlowResult};

/// Graph name used in exports when none is configured
pub const DEFAULT_GRAPH_NAME: &str = "FlowNetwork";

/// How a solver treats flow already present in the network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationMode {
    /// Continue from the current flow; the result is the flow added by this run
    #[default]
    Incremental,
    /// Clear all flow first; the result is the full maximum flow
    Reset,
}

impl FromStr for InvocationMode {
    type Err = FlowError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "incremental" => Ok(InvocationMode::Incremental),
            "reset" => Ok(InvocationMode::Reset),
            other => Err(FlowError::invalid_parameter(
                "invocation",
                format!("expected 'incremental' or 'reset', got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationMode::Incremental => f.write_str("incremental"),
            InvocationMode::Reset => f.write_str("reset"),
        }
    }
}

/// Flow solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Graph identifier written into DOT exports
    pub graph_name: String,

    /// Re-invocation policy
    pub invocation: InvocationMode,

    /// Keep every augmenting path in the solver result
    pub record_paths: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            graph_name: DEFAULT_GRAPH_NAME.to_owned(),
            invocation: InvocationMode::Incremental,
            record_paths: true,
        }
    }
}

impl FlowConfig {
    /// Parses and validates a JSON configuration document.
    /// Missing fields take their default values.
    pub fn from_json(document: &str) -> FlowResult<Self> {
        let config: FlowConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FlowResult<()> {
        validate_graph_name(&self.graph_name)
    }
}

/// Checks that `name` is a bare DOT identifier
pub fn validate_graph_name(name: &str) -> FlowResult<()> {
    let mut chars = name.chars();
    let first = chars
        .next()
        .ok_or_else(|| FlowError::invalid_parameter("graph_name", "must not be empty"))?;

    if first.is_ascii_digit() {
        return Err(FlowError::invalid_parameter(
            "graph_name",
            format!("'{}' must not start with a digit", name),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(FlowError::invalid_parameter(
            "graph_name",
            format!("'{}' may only contain ASCII letters, digits and '_'", name),
        ));
    }

    Ok(())
}
