//! Run reports handed to downstream writers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::policy::{Organelle, ResolvePolicyV1, Taxon};
use crate::resolver::Resolution;
use crate::types::ContigId;
use crate::REPORT_SCHEMA_VERSION;

/// One organelle phase of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Organelle resolved in this phase.
    pub organelle: Organelle,
    /// Seeds selected from similarity hits.
    pub initial_seeds: Vec<ContigId>,
    /// Seeds after growth and bubble pruning.
    pub seeds: Vec<ContigId>,
    /// Contigs removed as bubbles.
    pub pruned: Vec<ContigId>,
    /// Growth rounds executed.
    pub growth_rounds: u32,
    /// Link depth filter used for growth.
    pub link_filter: f64,
    /// Self-links added from junction evidence.
    pub junction_links: usize,
    /// Per-structure results.
    pub resolution: Resolution,
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    schema_version: &'a str,
    params_hash: &'a str,
    phases: &'a [PhaseReport],
}

/// Result of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Report schema version.
    pub schema_version: String,
    /// Policy identifier.
    pub policy_id: String,
    /// Quantized policy parameter hash.
    pub params_hash: String,
    /// Organelle requested.
    pub organelle: Organelle,
    /// Taxonomic group.
    pub taxon: Taxon,
    /// Phases in execution order; the last one is the requested organelle.
    pub phases: Vec<PhaseReport>,
    /// Hash over everything above except the timestamp.
    pub fingerprint: String,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    /// Assemble a report and compute its fingerprint.
    pub fn new(policy: &ResolvePolicyV1, phases: Vec<PhaseReport>) -> Self {
        let params_hash = policy.params_hash();
        let fingerprint = canonical_hash_hex(&FingerprintInput {
            schema_version: REPORT_SCHEMA_VERSION,
            params_hash: &params_hash,
            phases: &phases,
        });
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            policy_id: policy.policy_id().to_string(),
            params_hash,
            organelle: policy.organelle,
            taxon: policy.taxon,
            phases,
            fingerprint,
            generated_at: Utc::now(),
        }
    }

    /// The phase of the requested organelle.
    pub fn target_phase(&self) -> Option<&PhaseReport> {
        self.phases.last()
    }

    /// Whether the requested organelle resolved at least one structure.
    pub fn is_success(&self) -> bool {
        self.target_phase().map_or(false, |p| p.resolution.is_success())
    }

    /// Assembled contigs of the requested organelle.
    pub fn assembled(&self) -> &[ContigId] {
        self.target_phase().map_or(&[], |p| p.resolution.assembled.as_slice())
    }
}
