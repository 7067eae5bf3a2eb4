//! # organelle-path-kernel
//!
//! Deterministic path resolution for organelle genomes over contig
//! adjacency graphs.
//!
//! The kernel answers one question:
//!
//! > Given an assembled contig graph and marker hits, which ordered walk
//! > of contigs **is the organelle genome**?
//!
//! ## Core Contract
//!
//! 1. Grow a seed contig set from marker hits along depth-filtered links
//! 2. Split the seed-induced graph into structures and reduce each to a backbone
//! 3. Search every backbone for the best circular or linear path under pass budgets
//! 4. Report paths, coverage ratios and fingerprints for downstream writers
//!
//! ## Architecture
//!
//! ```text
//! Hits → HitSeeder → SeedGrowthEngine → decompose → simplify → PathSearchEngine → RunReport
//!                           ↑                                         ↑
//!                    GraphStore (memory)                        ResolvePolicyV1
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same hits + same policy → identical seeds, structures and backbones
//! - Link order is input order; contig sets are ordered by id
//! - The best path is identical across thread schedules unless the stall
//!   cutoff fires

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod policy;
pub mod store;
pub mod canonical;
pub mod hits;
pub mod seed;
pub mod structure;
pub mod backbone;
pub mod search;
pub mod resolver;
pub mod report;
pub mod pipeline;

// Re-exports
pub use types::{
    Contig, ContigId, ContigTable, HitParseError, Link, LinkEnd, Path, PathMetrics, PathScore,
    PathStep, PathType, SimilarityHit, Terminus,
};
pub use policy::{
    compare_candidates, evaluate_candidate, HitPolicy, Organelle, ResolvePolicyV1, SearchPolicy,
    SeedPolicy, Taxon,
};
pub use store::{read_graph, GraphReadError, GraphStore, InMemoryError, InMemoryGraphStore};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use hits::{resolve_query, HitSeeder, SeedCandidate};
pub use seed::{GrowthOutcome, SeedError, SeedGrowthEngine, SeedSet};
pub use structure::{decompose, Structure};
pub use backbone::{ambiguous_nodes, simplify, Backbone};
pub use search::{
    PassBudget, PathSearchEngine, SearchError, SearchFailure, SearchOutcome, SearchRequest,
};
pub use resolver::{
    PathResolver, Resolution, ResolveError, SkipReason, StructureOutcome, StructureStatus,
};
pub use report::{PhaseReport, RunReport};
pub use pipeline::{OrganellePipeline, PipelineHits};

/// Schema version of [`RunReport`].
/// Increment on breaking changes to any reported type.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Default policy version identifier.
pub const DEFAULT_POLICY_VERSION: &str = "resolve_policy_v1";
