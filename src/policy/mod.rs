//! Resolve policy definitions.

pub mod v1;
pub mod ranking;
pub mod markers;

pub use v1::{HitPolicy, Organelle, ResolvePolicyV1, SearchPolicy, SeedPolicy, Taxon};
pub use ranking::{compare_candidates, evaluate_candidate};
