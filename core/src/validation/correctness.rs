//! Flow Correctness Verification
//!
//! Independent checks for a computed flow: the structural invariants of the
//! flow matrix (antisymmetry, capacity bounds, conservation at interior
//! vertices) and max-flow/min-cut duality, verified against an exhaustive
//! enumeration of every source/sink cut.
//!
//! Enumeration is exponential in the vertex count and is meant for small
//! hand-built networks; it is spread across the rayon thread pool.

use rayon::prelude::*;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::algorithm::graph::max_flow::FlowNetwork;
use crate::algorithm::traits::{Capacity, Flow, FlowError, FlowResult, NodeId};

/// Largest vertex count accepted by exhaustive cut enumeration
pub const MAX_BRUTE_FORCE_VERTICES: usize = 20;

/// A single broken flow property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum Violation {
    #[error("flow({u}, {v}) = {forward} but flow({v}, {u}) = {backward}")]
    Antisymmetry { u: NodeId, v: NodeId, forward: Flow, backward: Flow },

    #[error("flow({u}, {v}) = {flow} exceeds capacity {capacity}")]
    CapacityExceeded { u: NodeId, v: NodeId, flow: Flow, capacity: Capacity },

    #[error("interior vertex {vertex} has net outflow {net}")]
    Conservation { vertex: NodeId, net: Flow },

    #[error("flow value {flow_value} differs from minimum cut capacity {min_cut}")]
    CutMismatch { flow_value: Flow, min_cut: Capacity },
}

/// Outcome of [`FlowVerifier::verify`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Net flow leaving the source
    pub flow_value: Flow,
    /// Exhaustive minimum cut capacity, when it was computed
    pub min_cut_capacity: Option<Capacity>,
    pub violations: Vec<Violation>,
}

impl VerificationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Verifies a saturated network between fixed terminals
#[derive(Debug, Clone)]
pub struct FlowVerifier {
    source: NodeId,
    sink: NodeId,
    /// Enumerate all cuts to check duality (small networks only)
    exhaustive_cut: bool,
}

impl FlowVerifier {
    pub fn new(source: NodeId, sink: NodeId) -> Self {
        Self {
            source,
            sink,
            exhaustive_cut: true,
        }
    }

    pub fn with_exhaustive_cut(mut self, enabled: bool) -> Self {
        self.exhaustive_cut = enabled;
        self
    }

    pub fn verify(&self, network: &FlowNetwork) -> FlowResult<VerificationReport> {
        network.check_terminals(self.source, self.sink)?;

        let (mut violations, (capacity, conservation)) = rayon::join(
            || check_antisymmetry(network),
            || {
                rayon::join(
                    || check_capacity_constraints(network),
                    || check_conservation(network, self.source, self.sink),
                )
            },
        );
        violations.extend(capacity);
        violations.extend(conservation);

        let flow_value = network.flow_value(self.source)?;

        let min_cut_capacity = if self.exhaustive_cut
            && network.vertex_count() <= MAX_BRUTE_FORCE_VERTICES
        {
            Some(brute_force_min_cut(network, self.source, self.sink)?)
        } else {
            None
        };

        if let Some(min_cut) = min_cut_capacity {
            if min_cut != flow_value {
                violations.push(Violation::CutMismatch { flow_value, min_cut });
            }
        }

        Ok(VerificationReport {
            flow_value,
            min_cut_capacity,
            violations,
        })
    }
}

/// Minimum capacity over all cuts separating `source` from `sink`,
/// found by enumerating every partition of the remaining vertices
pub fn brute_force_min_cut(
    network: &FlowNetwork,
    source: NodeId,
    sink: NodeId,
) -> FlowResult<Capacity> {
    network.check_terminals(source, sink)?;

    let n = network.vertex_count();
    if n > MAX_BRUTE_FORCE_VERTICES {
        return Err(FlowError::invalid_parameter(
            "vertex_count",
            format!(
                "exhaustive cut enumeration supports at most {} vertices, got {}",
                MAX_BRUTE_FORCE_VERTICES, n
            ),
        ));
    }

    let interior: Vec<NodeId> = (0..n).filter(|&v| v != source && v != sink).collect();
    let partitions: u64 = 1 << interior.len();

    let best = (0..partitions)
        .into_par_iter()
        .map(|mask| {
            let mut source_side = vec![false; n];
            source_side[source] = true;
            for (bit, &v) in interior.iter().enumerate() {
                if (mask >> bit) & 1 == 1 {
                    source_side[v] = true;
                }
            }
            cut_capacity(network, &source_side)
        })
        .min();

    Ok(best.unwrap_or(0))
}

/// Sum of capacities on edges leaving the marked vertex set
fn cut_capacity(network: &FlowNetwork, source_side: &[bool]) -> Capacity {
    let n = network.vertex_count();
    let mut total: Capacity = 0;
    for u in (0..n).filter(|&u| source_side[u]) {
        for v in (0..n).filter(|&v| !source_side[v]) {
            total = total.saturating_add(network.capacity_at(u, v));
        }
    }
    total
}

pub fn check_antisymmetry(network: &FlowNetwork) -> Vec<Violation> {
    let n = network.vertex_count();
    (0..n)
        .into_par_iter()
        .flat_map_iter(move |u| {
            (u..n).filter_map(move |v| {
                let forward = network.flow_at(u, v);
                let backward = network.flow_at(v, u);
                (forward != -backward).then_some(Violation::Antisymmetry { u, v, forward, backward })
            })
        })
        .collect()
}

pub fn check_capacity_constraints(network: &FlowNetwork) -> Vec<Violation> {
    let n = network.vertex_count();
    (0..n)
        .into_par_iter()
        .flat_map_iter(move |u| {
            (0..n).filter_map(move |v| {
                let flow = network.flow_at(u, v);
                let capacity = network.capacity_at(u, v);
                (flow > capacity).then_some(Violation::CapacityExceeded { u, v, flow, capacity })
            })
        })
        .collect()
}

/// Interior vertices must have zero net outflow
pub fn check_conservation(network: &FlowNetwork, source: NodeId, sink: NodeId) -> Vec<Violation> {
    let n = network.vertex_count();
    (0..n)
        .into_par_iter()
        .filter(|&vertex| vertex != source && vertex != sink)
        .filter_map(|vertex| {
            let net = (0..n)
                .map(|v| network.flow_at(vertex, v))
                .fold(0, Flow::saturating_add);
            (net != 0).then_some(Violation::Conservation { vertex, net })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(vertex_count: usize, edges: &[(NodeId, NodeId, Capacity)]) -> FlowNetwork {
        let mut network = FlowNetwork::new(vertex_count).unwrap();
        for &(u, v, c) in edges {
            network.add_edge(u, v, c).unwrap();
        }
        network
    }

    fn classic_network() -> FlowNetwork {
        build(6, &[
            (0, 1, 16), (0, 2, 13), (1, 2, 10), (1, 3, 12), (2, 1, 4),
            (2, 4, 14), (3, 2, 9), (3, 5, 20), (4, 3, 7), (4, 5, 4),
        ])
    }

    #[test]
    fn test_max_flow_min_cut_duality() {
        let cases: Vec<(FlowNetwork, NodeId, NodeId, Flow)> = vec![
            (classic_network(), 0, 5, 23),
            (build(4, &[(0, 1, 10), (0, 2, 5), (1, 3, 10), (2, 3, 5)]), 0, 3, 15),
            (
                build(6, &[(0, 1, 1), (0, 2, 1), (1, 3, 1), (1, 4, 1), (2, 3, 1), (3, 5, 1), (4, 5, 1)]),
                0, 5, 2,
            ),
            (
                build(6, &[
                    (0, 1, 10), (0, 2, 10), (1, 3, 4), (1, 4, 8), (2, 4, 9),
                    (3, 5, 10), (4, 3, 6), (4, 5, 10),
                ]),
                0, 5, 19,
            ),
            (build(4, &[(0, 1, 10), (2, 3, 5)]), 0, 3, 0),
        ];

        for (mut network, source, sink, expected) in cases {
            let cut = brute_force_min_cut(&network, source, sink).unwrap();
            let flow = network.compute_max_flow(source, sink).unwrap();
            assert_eq!(cut, expected);
            assert_eq!(flow, expected);
        }
    }

    #[test]
    fn test_verifier_accepts_saturated_network() {
        let mut network = classic_network();
        network.compute_max_flow(0, 5).unwrap();

        let report = FlowVerifier::new(0, 5).verify(&network).unwrap();
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.flow_value, 23);
        assert_eq!(report.min_cut_capacity, Some(23));
    }

    #[test]
    fn test_verifier_flags_unsaturated_flow() {
        let mut network = build(3, &[(0, 1, 5), (1, 2, 2)]);
        network.compute_max_flow(0, 2).unwrap();
        network.add_edge(1, 2, 2).unwrap();

        let report = FlowVerifier::new(0, 2).verify(&network).unwrap();
        assert_eq!(
            report.violations,
            vec![Violation::CutMismatch { flow_value: 2, min_cut: 4 }]
        );

        let report = FlowVerifier::new(0, 2)
            .with_exhaustive_cut(false)
            .verify(&network)
            .unwrap();
        assert!(report.is_valid());
        assert_eq!(report.min_cut_capacity, None);
    }

    #[test]
    fn test_conservation_relative_to_terminals() {
        let mut network = build(4, &[(0, 1, 3), (1, 2, 3), (2, 3, 3)]);
        network.compute_max_flow(1, 2).unwrap();

        // Flow pushed between 1 and 2 is fine for those terminals only
        assert!(check_conservation(&network, 1, 2).is_empty());

        let violations = check_conservation(&network, 0, 3);
        assert_eq!(violations.len(), 2);
        assert!(violations.contains(&Violation::Conservation { vertex: 1, net: 3 }));
        assert!(violations.contains(&Violation::Conservation { vertex: 2, net: -3 }));
    }

    #[test]
    fn test_antisymmetry_after_augmentations() {
        let mut network = classic_network();
        network.compute_max_flow(0, 5).unwrap();
        network.compute_max_flow(2, 3).unwrap();
        network.compute_max_flow(5, 0).unwrap();

        assert!(check_antisymmetry(&network).is_empty());
        assert!(check_capacity_constraints(&network).is_empty());
    }

    #[test]
    fn test_invariant_checks_detect_corruption() {
        let mut network = build(3, &[(0, 1, 2), (1, 2, 2)]);
        *network.flow_mut(0, 1) = 5;

        let antisymmetry = check_antisymmetry(&network);
        assert_eq!(
            antisymmetry,
            vec![Violation::Antisymmetry { u: 0, v: 1, forward: 5, backward: 0 }]
        );

        let capacity = check_capacity_constraints(&network);
        assert_eq!(
            capacity,
            vec![Violation::CapacityExceeded { u: 0, v: 1, flow: 5, capacity: 2 }]
        );
        assert_eq!(capacity[0].to_string(), "flow(0, 1) = 5 exceeds capacity 2");
    }

    #[test]
    fn test_brute_force_limits() {
        let network = FlowNetwork::new(MAX_BRUTE_FORCE_VERTICES + 1).unwrap();
        assert!(matches!(
            brute_force_min_cut(&network, 0, 1),
            Err(FlowError::InvalidParameter { .. })
        ));

        let network = FlowNetwork::new(2).unwrap();
        assert_eq!(brute_force_min_cut(&network, 0, 1).unwrap(), 0);
        assert!(brute_force_min_cut(&network, 1, 1).is_err());
    }
}
