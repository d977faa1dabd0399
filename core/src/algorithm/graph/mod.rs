//! Graph algorithms operating on flow networks

pub mod max_flow;

pub use self::max_flow::{EdmondsKarp, FlowEdge, FlowNetwork, FlowPath, MaxFlowResult, MinCut};
