//! Verification of computed flows

pub mod correctness;

pub use self::correctness::{
    brute_force_min_cut, check_antisymmetry, check_capacity_constraints, check_conservation,
    FlowVerifier, VerificationReport, Violation,
};
