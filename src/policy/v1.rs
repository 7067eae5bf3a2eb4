//! ResolvePolicy v1: every threshold used by the resolution pipeline.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing so that `params_hash`
//! does not depend on float formatting. The quantization factor is 1e6
//! (multiply by 1,000,000 and round to i64).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::canonical_hash_hex;
use crate::types::ContigId;
use crate::DEFAULT_POLICY_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Quantize a float to an i64 for deterministic hashing.
fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

/// Organelle being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Organelle {
    /// Mitochondrial genome.
    Mitochondrion,
    /// Plastid (chloroplast) genome.
    Plastid,
}

impl Organelle {
    /// Parse from a user-supplied string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mt" | "mito" | "mitochondrion" => Some(Self::Mitochondrion),
            "pt" | "plastid" | "chloroplast" => Some(Self::Plastid),
            _ => None,
        }
    }
}

impl fmt::Display for Organelle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mitochondrion => write!(f, "mitochondrion"),
            Self::Plastid => write!(f, "plastid"),
        }
    }
}

/// Taxonomic group of the sample.
///
/// Selects the marker gene table and gates the interfering-node ranking
/// criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Taxon {
    /// Land plants.
    Plant,
    /// Animals.
    Animal,
    /// Fungi.
    Fungi,
}

impl Taxon {
    /// Parse from a user-supplied string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plant" | "plants" => Some(Self::Plant),
            "animal" | "animals" => Some(Self::Animal),
            "fungi" | "fungus" => Some(Self::Fungi),
            _ => None,
        }
    }

    /// Whether path ranking penalises distinct interfering contigs.
    pub fn gates_interfering(&self) -> bool {
        !matches!(self, Self::Animal)
    }
}

impl fmt::Display for Taxon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plant => write!(f, "plant"),
            Self::Animal => write!(f, "animal"),
            Self::Fungi => write!(f, "fungi"),
        }
    }
}

/// Seed growth and bubble pruning thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Growth admits a link whose depth reaches this fraction of the smaller endpoint depth.
    pub growth_link_ratio: f64,
    /// Relaxed fraction used for the post-growth link set.
    pub bfs_link_ratio: f64,
    /// Rounds allowed before growth is declared non-convergent.
    pub max_rounds: u32,
    /// Contigs at or below this length are bubble candidates.
    pub bubble_max_len: u64,
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            growth_link_ratio: 0.5,
            bfs_link_ratio: 0.3,
            max_rounds: 100,
            bubble_max_len: 50,
        }
    }
}

/// Path search thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPolicy {
    /// Fan-out stops once this many roots exist.
    pub parallelism: usize,
    /// Evaluations without improvement before workers stop.
    pub stall_limit: u64,
    /// Evaluate partial paths whose coverage exceeds this ratio.
    pub coverage_eval_ratio: f64,
    /// Maximum neighbours on one side of a backbone contig.
    pub max_side_degree: usize,
    /// Contigs longer than this may lower the budget reference depth.
    pub budget_min_len: u64,
    /// ...when their depth also exceeds this fraction of the start depth.
    pub budget_depth_ratio: f64,
    /// Interfering passes allowed during fan-out.
    pub interfering_fanout_passes: u32,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        Self {
            parallelism: 8,
            stall_limit: 10_000_000,
            coverage_eval_ratio: 0.5,
            max_side_degree: 9,
            budget_min_len: 1000,
            budget_depth_ratio: 0.5,
            interfering_fanout_passes: 1,
        }
    }
}

/// Similarity-hit thresholds for seeding and circularity evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitPolicy {
    /// Minimum percent identity of a marker hit.
    pub marker_identity: f64,
    /// Minimum aligned fraction of the marker's reference length.
    pub marker_coverage: f64,
    /// Candidates considered after the depth floor.
    pub max_candidates: usize,
    /// Minimum alignment length of a plastid hit.
    pub plastid_min_align: u64,
    /// Minimum percent identity of a junction hit.
    pub junction_identity: f64,
    /// A junction hit must start at or before this query position.
    pub junction_max_start: u64,
    /// ...and end at or after this one.
    pub junction_min_end: u64,
    /// Supporting junction hits needed to add a self-link.
    pub junction_min_support: usize,
    /// Only contigs longer than this are searched for junction evidence.
    pub junction_min_contig_len: u64,
}

impl Default for HitPolicy {
    fn default() -> Self {
        Self {
            marker_identity: 70.0,
            marker_coverage: 0.4,
            max_candidates: 30,
            plastid_min_align: 500,
            junction_identity: 99.0,
            junction_max_start: 450,
            junction_min_end: 550,
            junction_min_support: 4,
            junction_min_contig_len: 1000,
        }
    }
}

/// Quantized policy parameters for deterministic hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct QuantizedPolicyParams {
    version: String,
    organelle: Organelle,
    taxon: Taxon,
    base_depth: i64,
    growth_link_ratio: i64,
    bfs_link_ratio: i64,
    max_rounds: u32,
    bubble_max_len: u64,
    parallelism: usize,
    stall_limit: u64,
    coverage_eval_ratio: i64,
    max_side_degree: usize,
    budget_min_len: u64,
    budget_depth_ratio: i64,
    interfering_fanout_passes: u32,
    marker_identity: i64,
    marker_coverage: i64,
    max_candidates: usize,
    plastid_min_align: u64,
    junction_identity: i64,
    junction_max_start: u64,
    junction_min_end: u64,
    junction_min_support: usize,
    junction_min_contig_len: u64,
    backbone_depth_ratio: i64,
    max_structure_nodes: usize,
    retry_ratio: i64,
    min_ratio: i64,
    excluded_contigs: Vec<ContigId>,
}

/// Resolve policy version 1.
///
/// ## Parameters
///
/// - `organelle` / `taxon`: what is being assembled and from which group
/// - `base_depth`: sequencing depth of the read set; sets the plant
///   mitochondrial link filter (`max(2 * base_depth, 1.5)`)
/// - `seed`: growth and bubble pruning thresholds
/// - `search`: path search thresholds
/// - `hits`: marker and junction hit thresholds
/// - `backbone_depth_ratio`: backbone link filter as a fraction of the reference depth
/// - `max_structure_nodes`: structures above this size are skipped
/// - `retry_ratio` / `min_ratio`: orientation retry and failure thresholds
/// - `excluded_contigs`: contigs never admitted to a backbone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvePolicyV1 {
    /// Policy version identifier.
    pub version: String,
    /// Organelle being resolved.
    pub organelle: Organelle,
    /// Taxonomic group.
    pub taxon: Taxon,
    /// Sequencing depth of the read set.
    pub base_depth: f64,
    /// Seed growth thresholds.
    pub seed: SeedPolicy,
    /// Path search thresholds.
    pub search: SearchPolicy,
    /// Similarity-hit thresholds.
    pub hits: HitPolicy,
    /// Backbone link filter as a fraction of the reference depth.
    pub backbone_depth_ratio: f64,
    /// Structures with more candidate nodes are skipped.
    pub max_structure_nodes: usize,
    /// Retry with swapped termini below this coverage ratio.
    pub retry_ratio: f64,
    /// Below this ratio a structure has no usable path.
    pub min_ratio: f64,
    /// Contigs never admitted to a backbone.
    pub excluded_contigs: Vec<ContigId>,
}

impl ResolvePolicyV1 {
    /// Default policy for an organelle and taxon.
    pub fn for_target(organelle: Organelle, taxon: Taxon) -> Self {
        Self {
            organelle,
            taxon,
            ..Self::default()
        }
    }

    /// Get the policy ID.
    pub fn policy_id(&self) -> &str {
        &self.version
    }

    /// Whether ranking penalises distinct interfering contigs for this run.
    pub fn gates_interfering(&self) -> bool {
        self.taxon.gates_interfering()
    }

    /// Link depth filter for mitochondrial seed growth in plants.
    pub fn plant_link_filter(&self) -> f64 {
        (2.0 * self.base_depth).max(1.5)
    }

    /// Link depth filter derived from the top seed's depth.
    pub fn seeded_link_filter(seed_depth: f64) -> f64 {
        if seed_depth > 4.0 {
            0.3 * seed_depth
        } else {
            2.0
        }
    }

    /// Compute a hash of the policy parameters.
    ///
    /// Floats are multiplied by 1e6 and rounded to i64 before hashing.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(&self.to_quantized())
    }

    fn to_quantized(&self) -> QuantizedPolicyParams {
        let mut excluded = self.excluded_contigs.clone();
        excluded.sort();
        excluded.dedup();
        QuantizedPolicyParams {
            version: self.version.clone(),
            organelle: self.organelle,
            taxon: self.taxon,
            base_depth: quantize_float(self.base_depth),
            growth_link_ratio: quantize_float(self.seed.growth_link_ratio),
            bfs_link_ratio: quantize_float(self.seed.bfs_link_ratio),
            max_rounds: self.seed.max_rounds,
            bubble_max_len: self.seed.bubble_max_len,
            parallelism: self.search.parallelism,
            stall_limit: self.search.stall_limit,
            coverage_eval_ratio: quantize_float(self.search.coverage_eval_ratio),
            max_side_degree: self.search.max_side_degree,
            budget_min_len: self.search.budget_min_len,
            budget_depth_ratio: quantize_float(self.search.budget_depth_ratio),
            interfering_fanout_passes: self.search.interfering_fanout_passes,
            marker_identity: quantize_float(self.hits.marker_identity),
            marker_coverage: quantize_float(self.hits.marker_coverage),
            max_candidates: self.hits.max_candidates,
            plastid_min_align: self.hits.plastid_min_align,
            junction_identity: quantize_float(self.hits.junction_identity),
            junction_max_start: self.hits.junction_max_start,
            junction_min_end: self.hits.junction_min_end,
            junction_min_support: self.hits.junction_min_support,
            junction_min_contig_len: self.hits.junction_min_contig_len,
            backbone_depth_ratio: quantize_float(self.backbone_depth_ratio),
            max_structure_nodes: self.max_structure_nodes,
            retry_ratio: quantize_float(self.retry_ratio),
            min_ratio: quantize_float(self.min_ratio),
            excluded_contigs: excluded,
        }
    }

    /// Create a minimal policy for testing: two workers and a short stall limit.
    #[cfg(test)]
    pub fn minimal() -> Self {
        Self {
            search: SearchPolicy {
                parallelism: 2,
                stall_limit: 10_000,
                ..SearchPolicy::default()
            },
            ..Self::default()
        }
    }
}

impl Default for ResolvePolicyV1 {
    fn default() -> Self {
        Self {
            version: DEFAULT_POLICY_VERSION.to_string(),
            organelle: Organelle::Mitochondrion,
            taxon: Taxon::Plant,
            base_depth: 1.0,
            seed: SeedPolicy::default(),
            search: SearchPolicy::default(),
            hits: HitPolicy::default(),
            backbone_depth_ratio: 0.3,
            max_structure_nodes: 200,
            retry_ratio: 0.7,
            min_ratio: 0.1,
            excluded_contigs: Vec::new(),
        }
    }
}
