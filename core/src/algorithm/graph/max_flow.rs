//! Edmonds-Karp Maximum Flow Implementation
//!
//! This module implements the maximum flow engine on a dense capacity/flow
//! matrix pair. Augmenting paths are found by breadth-first search over the
//! residual graph, so each round uses a fewest-edges path and the number of
//! augmentations stays polynomial.
//!
//! # Flow Representation
//! Flow is stored antisymmetrically: pushing `d` units along `(u, v)` adds
//! `d` to `flow[u][v]` and subtracts `d` from `flow[v][u]`. The residual
//! capacity `capacity[u][v] - flow[u][v]` of a reverse pair is therefore the
//! amount of forward flow that a later augmentation may cancel.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;
use log::{debug, trace};
use serde::{Serialize, Deserialize};

use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmProfiler, Capacity, Flow, FlowError, FlowMetrics, FlowResult,
    MaxFlowAlgorithm, NodeId,
};
use crate::config::{validate_graph_name, FlowConfig, InvocationMode};

/// Parent marker for vertices not yet reached by the search
const UNVISITED: NodeId = NodeId::MAX;

/// Flow edge view with capacity and current flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Source vertex
    pub from: NodeId,
    /// Target vertex
    pub to: NodeId,
    /// Accumulated edge capacity
    pub capacity: Capacity,
    /// Current flow through edge
    pub flow: Flow,
}

impl FlowEdge {
    /// Get residual capacity for forward direction
    pub fn residual_capacity(&self) -> Capacity {
        self.capacity.saturating_sub(self.flow)
    }

    pub fn is_saturated(&self) -> bool {
        self.residual_capacity() <= 0
    }
}

/// Dense flow network over a fixed vertex set
///
/// Capacities change only through [`FlowNetwork::add_edge`]; flow changes
/// only through the max-flow computation and [`FlowNetwork::reset_flow`].
/// The type holds no interior mutability, so sharing one instance across
/// threads requires external synchronisation for any `&mut` access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowNetwork {
    /// Number of vertices in network
    vertex_count: usize,
    /// Row-major `n x n` capacity matrix
    capacity: Vec<Capacity>,
    /// Row-major `n x n` antisymmetric flow matrix
    flow: Vec<Flow>,
}

impl FlowNetwork {
    /// Create new flow network with specified vertex count
    pub fn new(vertex_count: usize) -> FlowResult<Self> {
        if vertex_count == 0 {
            return Err(FlowError::EmptyNetwork);
        }

        let cells = vertex_count
            .checked_mul(vertex_count)
            .ok_or_else(|| FlowError::invalid_parameter("vertex_count", "matrix size overflows"))?;

        debug!("Created flow network with {} vertices", vertex_count);

        Ok(Self {
            vertex_count,
            capacity: vec![0; cells],
            flow: vec![0; cells],
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    fn cell(&self, from: NodeId, to: NodeId) -> usize {
        from * self.vertex_count + to
    }

    fn check_vertex(&self, vertex: NodeId) -> FlowResult<()> {
        if vertex < self.vertex_count {
            Ok(())
        } else {
            Err(FlowError::InvalidVertex {
                vertex,
                vertex_count: self.vertex_count,
            })
        }
    }

    pub(crate) fn check_terminals(&self, source: NodeId, sink: NodeId) -> FlowResult<()> {
        self.check_vertex(source)?;
        self.check_vertex(sink)?;
        if source == sink {
            return Err(FlowError::SourceEqualsSink(source));
        }
        Ok(())
    }

    /// Add `capacity` to the directed edge `from -> to`.
    ///
    /// Repeated insertions between the same pair accumulate. The total
    /// capacity leaving any vertex must fit in [`Capacity`], which keeps
    /// every flow value representable.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, capacity: Capacity) -> FlowResult<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if capacity < 0 {
            return Err(FlowError::NegativeCapacity { from, to, capacity });
        }

        let row = self.cell(from, 0)..self.cell(from, 0) + self.vertex_count;
        let fits = self.capacity[row]
            .iter()
            .try_fold(capacity, |total, &c| total.checked_add(c))
            .is_some();
        if !fits {
            return Err(FlowError::CapacityOverflow { from, to });
        }

        let index = self.cell(from, to);
        self.capacity[index] += capacity;

        debug!("Edge {} -> {} capacity now {}", from, to, self.capacity[index]);
        Ok(())
    }

    pub fn capacity(&self, from: NodeId, to: NodeId) -> FlowResult<Capacity> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.capacity_at(from, to))
    }

    pub fn flow(&self, from: NodeId, to: NodeId) -> FlowResult<Flow> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.flow_at(from, to))
    }

    pub fn residual_capacity(&self, from: NodeId, to: NodeId) -> FlowResult<Capacity> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        Ok(self.residual(from, to))
    }

    #[inline]
    pub(crate) fn capacity_at(&self, from: NodeId, to: NodeId) -> Capacity {
        self.capacity[self.cell(from, to)]
    }

    #[inline]
    pub(crate) fn flow_at(&self, from: NodeId, to: NodeId) -> Flow {
        self.flow[self.cell(from, to)]
    }

    #[cfg(test)]
    pub(crate) fn flow_mut(&mut self, from: NodeId, to: NodeId) -> &mut Flow {
        let index = self.cell(from, to);
        &mut self.flow[index]
    }

    #[inline]
    fn residual(&self, from: NodeId, to: NodeId) -> Capacity {
        let index = self.cell(from, to);
        self.capacity[index].saturating_sub(self.flow[index])
    }

    /// Edges with positive capacity in ascending `(from, to)` order
    pub fn edges(&self) -> impl Iterator<Item = FlowEdge> + '_ {
        let n = self.vertex_count;
        self.capacity
            .iter()
            .zip(self.flow.iter())
            .enumerate()
            .filter(|&(_, (&capacity, _))| capacity > 0)
            .map(move |(index, (&capacity, &flow))| FlowEdge {
                from: index / n,
                to: index % n,
                capacity,
                flow,
            })
    }

    pub fn edge_count(&self) -> usize {
        self.capacity.iter().filter(|&&c| c > 0).count()
    }

    /// Net flow currently leaving `source`
    pub fn flow_value(&self, source: NodeId) -> FlowResult<Flow> {
        self.check_vertex(source)?;
        Ok((0..self.vertex_count)
            .map(|v| self.flow_at(source, v))
            .fold(0, Flow::saturating_add))
    }

    /// Zero the flow matrix, leaving capacities untouched
    pub fn reset_flow(&mut self) {
        self.flow.fill(0);
    }

    /// Augment from `source` to `sink` until no augmenting path remains.
    ///
    /// Continues from whatever flow the network already carries and returns
    /// the flow added by this call. Call [`FlowNetwork::reset_flow`] first
    /// to recompute from zero. When `sink` is unreachable in the residual
    /// graph the flow matrix is left untouched and `0` is returned.
    pub fn compute_max_flow(&mut self, source: NodeId, sink: NodeId) -> FlowResult<Flow> {
        self.check_terminals(source, sink)?;
        let mut profiler = AlgorithmProfiler::new();
        Ok(self.augment_to_saturation(source, sink, &mut profiler, None))
    }

    /// Main Edmonds-Karp loop. Terminals must already be validated.
    fn augment_to_saturation(
        &mut self,
        source: NodeId,
        sink: NodeId,
        profiler: &mut AlgorithmProfiler,
        mut paths: Option<&mut Vec<FlowPath>>,
    ) -> Flow {
        let mut total: Flow = 0;
        let mut augmentations = 0usize;
        let mut parent = vec![UNVISITED; self.vertex_count];

        while self.find_augmenting_path(source, sink, &mut parent, profiler) {
            // Walk parent pointers back from the sink
            let mut path = vec![sink];
            let mut bottleneck = Capacity::MAX;
            let mut v = sink;
            while v != source {
                let u = parent[v];
                bottleneck = bottleneck.min(self.residual(u, v));
                path.push(u);
                v = u;
            }
            path.reverse();

            for hop in path.windows(2) {
                let (u, v) = (hop[0], hop[1]);
                let forward = self.cell(u, v);
                let backward = self.cell(v, u);
                self.flow[forward] += bottleneck;
                self.flow[backward] -= bottleneck;
            }

            trace!("Augmented {} units along {:?}", bottleneck, path);

            total = total.saturating_add(bottleneck);
            augmentations += 1;
            profiler.record_augmentation();

            if let Some(paths) = paths.as_deref_mut() {
                paths.push(FlowPath { path, flow: bottleneck });
            }
        }

        debug!(
            "Max flow {} -> {}: {} augmentations, {} units added",
            source, sink, augmentations, total
        );

        total
    }

    /// Breadth-first search over residual edges; fills `parent` and reports
    /// whether `sink` was reached
    fn find_augmenting_path(
        &self,
        source: NodeId,
        sink: NodeId,
        parent: &mut [NodeId],
        profiler: &mut AlgorithmProfiler,
    ) -> bool {
        parent.fill(UNVISITED);
        parent[source] = source;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            profiler.record_scan();

            for next in 0..self.vertex_count {
                if parent[next] == UNVISITED && self.residual(current, next) > 0 {
                    parent[next] = current;
                    if next == sink {
                        return true;
                    }
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Vertices reachable from `source` through positive residual capacity
    fn residual_reachable(&self, source: NodeId) -> Vec<bool> {
        let mut reached = vec![false; self.vertex_count];
        reached[source] = true;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(current) = queue.pop_front() {
            for next in 0..self.vertex_count {
                if !reached[next] && self.residual(current, next) > 0 {
                    reached[next] = true;
                    queue.push_back(next);
                }
            }
        }

        reached
    }

    /// Cut induced by residual reachability from `source`.
    ///
    /// Once the network has been saturated towards a sink this is a minimum
    /// cut, and its capacity equals the maximum flow value.
    pub fn min_cut(&self, source: NodeId) -> FlowResult<MinCut> {
        self.check_vertex(source)?;
        let reached = self.residual_reachable(source);

        let source_side = (0..self.vertex_count).filter(|&v| reached[v]).collect();
        let cut_edges: Vec<FlowEdge> = self
            .edges()
            .filter(|edge| reached[edge.from] && !reached[edge.to])
            .collect();
        let capacity = cut_edges
            .iter()
            .map(|edge| edge.capacity)
            .fold(0, Capacity::saturating_add);

        Ok(MinCut {
            source_side,
            cut_edges,
            capacity,
        })
    }
}

/// Flow path representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPath {
    /// Path vertices from source to sink
    pub path: Vec<NodeId>,
    /// Flow amount along path
    pub flow: Flow,
}

/// Source-side vertex set and the forward edges leaving it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinCut {
    pub source_side: Vec<NodeId>,
    pub cut_edges: Vec<FlowEdge>,
    pub capacity: Capacity,
}

impl MinCut {
    pub fn contains(&self, vertex: NodeId) -> bool {
        self.source_side.binary_search(&vertex).is_ok()
    }
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Flow added by this run
    pub max_flow: Flow,
    /// Net flow leaving the source after this run
    pub total_flow: Flow,
    /// Augmenting paths in the order they were applied
    pub flow_paths: Vec<FlowPath>,
    /// Residual cut after saturation
    pub min_cut: MinCut,
    /// Algorithm performance metrics
    pub metrics: FlowMetrics,
}

/// Edmonds-Karp solver with configurable re-invocation policy
#[derive(Debug, Clone, Default)]
pub struct EdmondsKarp {
    config: FlowConfig,
}

impl EdmondsKarp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FlowConfig) -> FlowResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }
}

impl MaxFlowAlgorithm for EdmondsKarp {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn description(&self) -> String {
        "Ford-Fulkerson with breadth-first shortest augmenting paths over a dense residual matrix."
            .to_owned()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V^3 E)".to_owned(),
            space_complexity: "O(V^2)".to_owned(),
        }
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> FlowResult<()> {
        match name {
            "graph_name" => {
                validate_graph_name(value)?;
                self.config.graph_name = value.to_owned();
            }
            "invocation" => {
                self.config.invocation = value.parse::<InvocationMode>()?;
            }
            "record_paths" => {
                self.config.record_paths = value.parse::<bool>().map_err(|_| {
                    FlowError::invalid_parameter(name, "record_paths must be 'true' or 'false'")
                })?;
            }
            _ => {
                return Err(FlowError::invalid_parameter(name, "unknown parameter"));
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "graph_name" => Some(self.config.graph_name.clone()),
            "invocation" => Some(self.config.invocation.to_string()),
            "record_paths" => Some(self.config.record_paths.to_string()),
            _ => None,
        }
    }

    fn solve(
        &mut self,
        network: &mut FlowNetwork,
        source: NodeId,
        sink: NodeId,
    ) -> FlowResult<MaxFlowResult> {
        network.check_terminals(source, sink)?;

        if self.config.invocation == InvocationMode::Reset {
            network.reset_flow();
        }

        let mut profiler = AlgorithmProfiler::new();
        let mut flow_paths = Vec::new();

        profiler.start();
        let max_flow = network.augment_to_saturation(
            source,
            sink,
            &mut profiler,
            self.config.record_paths.then_some(&mut flow_paths),
        );
        profiler.stop();

        Ok(MaxFlowResult {
            max_flow,
            total_flow: network.flow_value(source)?,
            flow_paths,
            min_cut: network.min_cut(source)?,
            metrics: profiler.get_metrics(),
        })
    }
}
