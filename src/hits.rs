//! Seed selection and circularity evidence from similarity hits.
//!
//! Hits come from an external similarity search of the contigs against
//! conserved marker genes (mitochondrion), a plastid reference, or the
//! end-to-start junction of long contigs.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::policy::markers::marker_length;
use crate::policy::{HitPolicy, Taxon};
use crate::seed::SeedSet;
use crate::types::{ContigId, ContigTable, Link, LinkEnd, SimilarityHit, Terminus};

/// Resolve a hit query id to a contig.
///
/// Tries the display name first, then strips a `contig` prefix and
/// leading zeros (`contig00012` and `12` both resolve to contig 12).
pub fn resolve_query(contigs: &ContigTable, query: &str) -> Option<ContigId> {
    static CONTIG_NUMBER: OnceLock<Option<Regex>> = OnceLock::new();

    if let Some(id) = contigs.id_by_name(query) {
        return Some(id);
    }
    let pattern = CONTIG_NUMBER
        .get_or_init(|| Regex::new(r"^(?:contig)?0*([0-9]+)$").ok())
        .as_ref()?;
    let number: u32 = pattern.captures(query)?.get(1)?.as_str().parse().ok()?;
    let id = ContigId::new(number);
    contigs.contains(id).then_some(id)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A contig proposed as an initial seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedCandidate {
    /// Candidate contig.
    pub contig: ContigId,
    /// Distinct marker genes hit (0 for plastid seeds).
    pub genes: usize,
    /// Ranking score, higher first.
    pub score: f64,
}

/// Selects initial seeds and circularity links from similarity hits.
pub struct HitSeeder<'a> {
    contigs: &'a ContigTable,
    policy: &'a HitPolicy,
}

impl<'a> HitSeeder<'a> {
    /// Create a seeder over a contig table.
    pub fn new(contigs: &'a ContigTable, policy: &'a HitPolicy) -> Self {
        Self { contigs, policy }
    }

    /// Rank contigs carrying mitochondrial marker genes.
    ///
    /// Plants keep every candidate; animals and fungi keep the best one.
    pub fn marker_seeds(
        &self,
        hits: &[SimilarityHit],
        taxon: Taxon,
        depth_filter: f64,
    ) -> Vec<SeedCandidate> {
        let mut genes: BTreeMap<ContigId, BTreeSet<&str>> = BTreeMap::new();
        for hit in hits {
            let Some(gene_len) = marker_length(taxon, hit.gene()) else {
                continue;
            };
            if hit.identity <= self.policy.marker_identity
                || (hit.align_len as f64) <= self.policy.marker_coverage * gene_len as f64
            {
                continue;
            }
            if let Some(id) = resolve_query(self.contigs, &hit.query) {
                genes.entry(id).or_default().insert(hit.gene());
            }
        }

        let best = genes.iter().fold(None, |best: Option<(ContigId, usize)>, (&id, set)| {
            match best {
                Some((bid, bn))
                    if (bn, self.contigs.length(bid)) >= (set.len(), self.contigs.length(id)) =>
                {
                    Some((bid, bn))
                }
                _ => Some((id, set.len())),
            }
        });
        let Some((best_id, best_genes)) = best else {
            warn!(taxon = %taxon, "No seed contigs found");
            return Vec::new();
        };

        let depth_floor = if best_genes > 1 {
            self.contigs.depth(best_id)
        } else {
            10.0 / 3.0 * depth_filter
        };

        let mut candidates: Vec<SeedCandidate> = genes
            .iter()
            .filter(|(&id, _)| self.contigs.depth(id) > 0.3 * depth_floor)
            .map(|(&id, set)| {
                let depth = self.contigs.depth(id);
                let len = self.contigs.length(id) as f64;
                let n = set.len() as f64;
                let weight = match taxon {
                    Taxon::Animal => n * 2.0,
                    Taxon::Plant | Taxon::Fungi => n * n,
                };
                SeedCandidate {
                    contig: id,
                    genes: set.len(),
                    score: sigmoid((depth * len.sqrt()).sqrt() / 100.0) * weight,
                }
            })
            .collect();
        sort_candidates(&mut candidates);
        candidates.truncate(self.policy.max_candidates);
        if taxon != Taxon::Plant {
            candidates.truncate(1);
        }

        if candidates.is_empty() {
            warn!(taxon = %taxon, depth_floor = depth_floor, "No seed contigs found");
        } else {
            info!(
                taxon = %taxon,
                seeds = candidates.len(),
                best = %best_id,
                best_genes = best_genes,
                "Marker seeds selected"
            );
        }
        candidates
    }

    /// Pick the best contig matching a plastid reference.
    pub fn plastid_seeds(&self, hits: &[SimilarityHit], depth_filter: f64) -> Vec<SeedCandidate> {
        let mut best: BTreeMap<ContigId, f64> = BTreeMap::new();
        for hit in hits {
            if hit.identity <= self.policy.marker_identity || hit.align_len <= self.policy.plastid_min_align {
                continue;
            }
            let Some(id) = resolve_query(self.contigs, &hit.query) else {
                continue;
            };
            let depth = self.contigs.depth(id);
            if depth <= depth_filter {
                continue;
            }
            let mass = self.contigs.length(id) as f64 * hit.identity * hit.align_len as f64;
            let score = (depth * mass.sqrt().sqrt()).sqrt();
            let entry = best.entry(id).or_insert(score);
            *entry = entry.max(score);
        }

        let mut candidates: Vec<SeedCandidate> = best
            .into_iter()
            .map(|(contig, score)| SeedCandidate { contig, genes: 0, score })
            .collect();
        sort_candidates(&mut candidates);
        candidates.truncate(1);
        if candidates.is_empty() {
            warn!("No plastid seed contigs found");
        }
        candidates
    }

    /// Self-links for seed contigs whose end-to-start junction is
    /// supported by enough junction hits.
    ///
    /// Contigs that already carry a self-link in `links` are skipped.
    pub fn junction_links(&self, hits: &[SimilarityHit], seeds: &SeedSet, links: &[Link]) -> Vec<Link> {
        let mut support: BTreeMap<ContigId, usize> = BTreeMap::new();
        for hit in hits {
            if hit.identity < self.policy.junction_identity
                || hit.q_start > self.policy.junction_max_start
                || hit.q_end < self.policy.junction_min_end
            {
                continue;
            }
            let Some(id) = resolve_query(self.contigs, &hit.query) else {
                continue;
            };
            if seeds.contains(id) && self.contigs.length(id) > self.policy.junction_min_contig_len {
                *support.entry(id).or_default() += 1;
            }
        }

        let looped: BTreeSet<ContigId> = links
            .iter()
            .filter(|l| l.is_self_link())
            .map(|l| l.left.contig)
            .collect();

        support
            .into_iter()
            .filter(|&(id, n)| n >= self.policy.junction_min_support && !looped.contains(&id))
            .map(|(id, n)| {
                debug!(contig = %id, support = n, "Adding junction self-link");
                Link::new(
                    LinkEnd::new(id, Terminus::Tail),
                    LinkEnd::new(id, Terminus::Head),
                    self.contigs.depth(id),
                )
            })
            .collect()
    }
}

fn sort_candidates(candidates: &mut [SeedCandidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.contig.cmp(&b.contig))
    });
}
