//! Structure-by-structure path resolution.
//!
//! The resolver decomposes the grown link set into structures, reduces
//! each to a backbone, picks a start contig and runs the path search in
//! one or both orientations. Structures that cannot be resolved are
//! reported as data; only precondition failures abort the run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backbone::{simplify, Backbone};
use crate::canonical::canonical_hash_hex;
use crate::policy::{Organelle, ResolvePolicyV1, Taxon};
use crate::search::{PathSearchEngine, SearchError, SearchFailure, SearchOutcome, SearchRequest};
use crate::seed::{SeedError, SeedSet};
use crate::store::GraphReadError;
use crate::structure::{decompose, Structure};
use crate::types::{ContigId, ContigTable, HitParseError, Link, Path, PathStep, PathType, Terminus};

/// Depth multiplier applied to the filter depth when no seed is deep enough.
const REFERENCE_DEPTH_FACTOR: f64 = 10.0 / 3.0;

/// Target contigs longer than this anchor a bridge to interfering sequence
/// on their own.
const FOREIGN_ANCHOR_LEN: u64 = 2000;

/// Error type for a resolution run.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Seed growth did not converge.
    #[error(transparent)]
    Seed(#[from] SeedError),
    /// The path search could not start.
    #[error(transparent)]
    Search(#[from] SearchError),
    /// The contig graph could not be read.
    #[error(transparent)]
    GraphRead(#[from] GraphReadError),
    /// A similarity-hit table could not be parsed.
    #[error(transparent)]
    HitParse(#[from] HitParseError),
}

/// Why a structure was not searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// More backbone candidates than the complexity cap allows.
    TooComplex {
        /// Candidate node count.
        nodes: usize,
    },
    /// Only other-organelle sequence.
    Foreign,
    /// No contig above the backbone depth filter.
    BelowDepth,
}

/// What happened to one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StructureStatus {
    /// A usable path was found.
    Resolved {
        /// The winning path.
        path: Path,
        /// Coverage of the structure's target sequence.
        coverage_ratio: f64,
        /// Mean depth over the path steps.
        mean_depth: f64,
        /// The path was forced to be linear.
        forced_linear: bool,
        /// Fingerprint of the path steps.
        fingerprint: String,
    },
    /// The search ran but produced nothing usable.
    NoPath {
        /// Best coverage reached.
        coverage_ratio: f64,
        /// Structural failure reported by the search, if any.
        failure: Option<SearchFailure>,
    },
    /// The structure was not searched.
    Skipped {
        /// Reason.
        reason: SkipReason,
    },
}

/// Resolution result of one structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureOutcome {
    /// Structure index in decomposition order.
    pub index: usize,
    /// Contigs in the structure.
    pub nodes: usize,
    /// Backbone contigs searched.
    pub backbone: Vec<ContigId>,
    /// Outcome.
    pub status: StructureStatus,
}

impl StructureOutcome {
    /// The resolved path, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            StructureStatus::Resolved { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Result of resolving every structure of one seed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Depth the backbone filter is derived from.
    pub reference_depth: f64,
    /// Minimum endpoint depth of a backbone link.
    pub backbone_filter: f64,
    /// Per-structure outcomes.
    pub structures: Vec<StructureOutcome>,
    /// Contigs of every resolved path, in resolution order.
    pub assembled: Vec<ContigId>,
    /// Backbone contigs of every structure within the complexity cap.
    pub backbone_nodes: Vec<ContigId>,
}

impl Resolution {
    /// Whether at least one structure resolved.
    pub fn is_success(&self) -> bool {
        self.structures.iter().any(|s| s.path().is_some())
    }
}

struct Candidate {
    backbone: Backbone,
    forced_linear: bool,
}

/// Drives decomposition, simplification and search per structure.
#[derive(Debug, Clone)]
pub struct PathResolver {
    policy: ResolvePolicyV1,
    engine: PathSearchEngine,
}

impl PathResolver {
    /// Create a resolver for a policy.
    pub fn new(policy: ResolvePolicyV1) -> Self {
        let engine = PathSearchEngine::new(policy.search.clone(), policy.gates_interfering());
        Self { policy, engine }
    }

    /// Policy in use.
    pub fn policy(&self) -> &ResolvePolicyV1 {
        &self.policy
    }

    /// Resolve every structure of the seed-induced link set.
    ///
    /// `filter_depth` is the link depth filter seed growth used.
    pub fn resolve(
        &self,
        contigs: &ContigTable,
        seeds: &SeedSet,
        links: &[Link],
        interfering: &BTreeSet<ContigId>,
        filter_depth: f64,
    ) -> Result<Resolution, ResolveError> {
        let structures = decompose(seeds.as_slice(), links);
        let reference_depth = reference_depth(&structures, contigs, interfering, filter_depth);
        let backbone_filter = self.policy.backbone_depth_ratio * reference_depth;
        let top_seed_depth = seeds.first().map(|id| contigs.depth(id));

        info!(
            structures = structures.len(),
            reference_depth = reference_depth,
            backbone_filter = backbone_filter,
            "Resolving structures"
        );

        let mut outcomes = Vec::with_capacity(structures.len());
        let mut assembled = Vec::new();
        let mut backbone_nodes: Vec<ContigId> = Vec::new();
        for structure in &structures {
            let outcome = self.resolve_structure(
                structure,
                contigs,
                interfering,
                backbone_filter,
                top_seed_depth,
            )?;
            if !matches!(
                outcome.status,
                StructureStatus::Skipped {
                    reason: SkipReason::TooComplex { .. } | SkipReason::BelowDepth
                }
            ) {
                for &id in &outcome.backbone {
                    if !backbone_nodes.contains(&id) {
                        backbone_nodes.push(id);
                    }
                }
            }
            if let Some(path) = outcome.path() {
                assembled.extend(path.assembled_contigs());
            }
            outcomes.push(outcome);
        }

        Ok(Resolution {
            reference_depth,
            backbone_filter,
            structures: outcomes,
            assembled,
            backbone_nodes,
        })
    }

    fn resolve_structure(
        &self,
        structure: &Structure,
        contigs: &ContigTable,
        interfering: &BTreeSet<ContigId>,
        backbone_filter: f64,
        top_seed_depth: Option<f64>,
    ) -> Result<StructureOutcome, ResolveError> {
        let outcome = |backbone: Vec<ContigId>, status: StructureStatus| StructureOutcome {
            index: structure.index,
            nodes: structure.len(),
            backbone,
            status,
        };

        let Some(candidate) = self.select_backbone(structure, contigs, backbone_filter, top_seed_depth) else {
            debug!(structure = structure.index, "No contig above the backbone filter");
            return Ok(outcome(Vec::new(), StructureStatus::Skipped { reason: SkipReason::BelowDepth }));
        };
        let backbone = candidate.backbone;
        let nodes = backbone.nodes.clone();

        if backbone.len() > self.policy.max_structure_nodes {
            warn!(
                structure = structure.index,
                nodes = backbone.len(),
                cap = self.policy.max_structure_nodes,
                "Too many candidate nodes, skipping structure"
            );
            return Ok(outcome(
                nodes,
                StructureStatus::Skipped {
                    reason: SkipReason::TooComplex { nodes: backbone.len() },
                },
            ));
        }

        if is_foreign(&backbone.links, interfering, contigs) {
            info!(structure = structure.index, "Structure belongs to the other organelle");
            return Ok(outcome(nodes, StructureStatus::Skipped { reason: SkipReason::Foreign }));
        }

        if backbone.links.is_empty() {
            return Ok(match backbone.nodes.as_slice() {
                [only] => {
                    let path = Path {
                        steps: vec![PathStep::new(*only, Terminus::Head)],
                        length: contigs.length(*only),
                        path_type: PathType::Linear,
                    };
                    info!(structure = structure.index, contig = %only, "Single-contig structure");
                    outcome(nodes, resolved(path, 1.0, true, contigs))
                }
                _ => outcome(nodes, StructureStatus::Skipped { reason: SkipReason::BelowDepth }),
            });
        }

        let longest = backbone
            .nodes
            .iter()
            .copied()
            .filter(|id| !interfering.contains(id))
            .fold(None, |best: Option<ContigId>, id| match best {
                Some(b) if contigs.length(b) >= contigs.length(id) => Some(b),
                _ => Some(id),
            });
        let Some(longest) = longest else {
            warn!(structure = structure.index, "Failed to find path: no target contig on the backbone");
            return Ok(outcome(nodes, StructureStatus::NoPath { coverage_ratio: 0.0, failure: None }));
        };

        let forced_start = if candidate.forced_linear {
            one_sided_start(&backbone, contigs)
        } else {
            None
        };
        let linear = forced_start.is_some();
        let (start, entry, exit) = match forced_start {
            Some((id, linked)) => (id, linked.opposite(), linked),
            None => (longest, Terminus::Head, Terminus::Tail),
        };

        let targets: BTreeSet<ContigId> = backbone.node_set().difference(interfering).copied().collect();
        let search = |entry: Terminus, end: Terminus| -> Result<SearchOutcome, SearchError> {
            self.engine.find_best_path(&SearchRequest {
                start: PathStep::new(start, entry),
                end: PathStep::new(start, end),
                backbone: &backbone,
                contigs,
                targets: &targets,
                interfering,
            })
        };

        let mut best = search(entry, exit)?;
        if (!best.ok || best.coverage_ratio < self.policy.retry_ratio) && !linear {
            debug!(
                structure = structure.index,
                ok = best.ok,
                ratio = best.coverage_ratio,
                "Retrying with swapped termini"
            );
            let swapped = search(exit, entry)?;
            if prefer_swapped(&swapped, &best) {
                best = swapped;
            }
        }

        if !best.ok || best.coverage_ratio < self.policy.min_ratio {
            warn!(
                structure = structure.index,
                ratio = best.coverage_ratio,
                failure = ?best.failure,
                "Failed to find path"
            );
            return Ok(outcome(
                nodes,
                StructureStatus::NoPath {
                    coverage_ratio: best.coverage_ratio,
                    failure: best.failure,
                },
            ));
        }

        let path = best.score.to_path();
        info!(
            structure = structure.index,
            path_type = %path.path_type,
            length = path.length,
            ratio = best.coverage_ratio,
            steps = path.len(),
            "Path resolved"
        );
        Ok(outcome(nodes, resolved(path, best.coverage_ratio, linear, contigs)))
    }

    fn select_backbone(
        &self,
        structure: &Structure,
        contigs: &ContigTable,
        backbone_filter: f64,
        top_seed_depth: Option<f64>,
    ) -> Option<Candidate> {
        let excluded: BTreeSet<ContigId> = self.policy.excluded_contigs.iter().copied().collect();
        let backbone = simplify(&structure.links, contigs, &excluded, backbone_filter);
        let whole = || Candidate {
            backbone: Backbone::from_structure(structure),
            forced_linear: true,
        };

        if backbone.is_empty() {
            let any_deep = structure.nodes.iter().any(|&id| contigs.depth(id) > backbone_filter);
            return any_deep.then(whole);
        }

        let strict = self.policy.organelle == Organelle::Plastid || self.policy.taxon != Taxon::Plant;
        if let (true, Some(top)) = (strict, top_seed_depth) {
            let stray = structure.nodes.iter().copied().find(|&id| {
                let depth = contigs.depth(id);
                !backbone.contains(id)
                    && depth > 0.4 * top
                    && depth < 2.0 * top
                    && contigs.length(id) > 100
            });
            if let Some(id) = stray {
                debug!(structure = structure.index, contig = %id, "Off-backbone contig forces a linear candidate");
                return Some(whole());
            }
        }

        Some(Candidate {
            backbone,
            forced_linear: false,
        })
    }
}

/// A usable path beats an unusable one; otherwise the higher ratio wins.
fn prefer_swapped(swapped: &SearchOutcome, first: &SearchOutcome) -> bool {
    match (swapped.ok, first.ok) {
        (true, false) => true,
        (false, true) => false,
        _ => swapped.coverage_ratio > first.coverage_ratio,
    }
}

fn resolved(path: Path, coverage_ratio: f64, forced_linear: bool, contigs: &ContigTable) -> StructureStatus {
    let mean_depth = if path.steps.is_empty() {
        0.0
    } else {
        path.steps.iter().map(|s| contigs.depth(s.contig)).sum::<f64>() / path.steps.len() as f64
    };
    let fingerprint = canonical_hash_hex(&path.steps);
    StructureStatus::Resolved {
        path,
        coverage_ratio,
        mean_depth,
        forced_linear,
        fingerprint,
    }
}

/// Depth of the longest non-interfering contig over all structures,
/// raised when it falls below the growth filter.
pub fn reference_depth(
    structures: &[Structure],
    contigs: &ContigTable,
    interfering: &BTreeSet<ContigId>,
    filter_depth: f64,
) -> f64 {
    let longest = structures
        .iter()
        .flat_map(|s| s.nodes.iter().copied())
        .filter(|id| !interfering.contains(id))
        .fold(None, |best: Option<ContigId>, id| match best {
            Some(b) if contigs.length(b) >= contigs.length(id) => Some(b),
            _ => Some(id),
        });
    let depth = longest.map_or(0.0, |id| contigs.depth(id));
    if depth < filter_depth {
        REFERENCE_DEPTH_FACTOR * filter_depth
    } else {
        depth
    }
}

/// Longest backbone contig whose links all attach to one terminus, with
/// that terminus.
fn one_sided_start(backbone: &Backbone, contigs: &ContigTable) -> Option<(ContigId, Terminus)> {
    let mut best: Option<(ContigId, Terminus)> = None;
    for &id in &backbone.nodes {
        let mut sides = backbone
            .links
            .iter()
            .flat_map(|l| [l.left, l.right])
            .filter(|end| end.contig == id)
            .map(|end| end.terminus);
        let Some(first) = sides.next() else {
            continue;
        };
        if sides.any(|t| t != first) {
            continue;
        }
        if best.map_or(true, |(b, _)| contigs.length(id) > contigs.length(b)) {
            best = Some((id, first));
        }
    }
    best
}

/// Links among interfering contigs exist, but none bridges to target sequence.
///
/// A link from an interfering contig into a target contig only bridges when
/// that target contig is anchored: linked to another non-interfering contig,
/// or long enough to stand on its own.
fn is_foreign(links: &[Link], interfering: &BTreeSet<ContigId>, contigs: &ContigTable) -> bool {
    if interfering.is_empty() {
        return false;
    }
    let anchored = |target: ContigId| {
        contigs.length(target) > FOREIGN_ANCHOR_LEN
            || links.iter().any(|l| {
                let [a, b] = l.contigs();
                (a == target && !interfering.contains(&b)) || (b == target && !interfering.contains(&a))
            })
    };

    let mut internal = 0usize;
    for link in links {
        let [a, b] = link.contigs();
        match (interfering.contains(&a), interfering.contains(&b)) {
            (true, true) => internal += 1,
            (true, false) if anchored(b) => return false,
            (false, true) if anchored(a) => return false,
            _ => {}
        }
    }
    internal > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Contig;

    fn table(specs: &[(u64, f64)]) -> ContigTable {
        ContigTable::from_contigs(
            specs
                .iter()
                .enumerate()
                .map(|(i, &(len, d))| Contig::new(ContigId::new(i as u32 + 1), format!("c{i}"), len, d))
                .collect(),
        )
        .unwrap()
    }

    fn seeds(ids: &[u32]) -> SeedSet {
        ids.iter().copied().map(ContigId::new).collect()
    }

    fn cycle() -> Vec<Link> {
        vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 3, Terminus::Head, 10.0),
            Link::between(3, Terminus::Tail, 1, Terminus::Head, 10.0),
        ]
    }

    fn plant_resolver() -> PathResolver {
        PathResolver::new(ResolvePolicyV1::minimal())
    }

    #[test]
    fn test_cycle_resolves_circular() {
        let contigs = table(&[(1000, 20.0), (2000, 20.0), (1500, 20.0)]);
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2, 3]), &cycle(), &BTreeSet::new(), 2.0)
            .unwrap();
        assert!(resolution.is_success());
        let path = resolution.structures[0].path().unwrap();
        assert_eq!(path.path_type, PathType::Circular);
        assert_eq!(path.length, 4500);
        // starts at the longest contig
        assert_eq!(path.steps[0].contig, ContigId::new(2));
        assert_eq!(resolution.assembled.len(), 3);
    }

    #[test]
    fn test_chain_falls_back_to_forced_linear() {
        let contigs = table(&[(1000, 20.0), (2000, 20.0), (1500, 20.0)]);
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 3, Terminus::Head, 10.0),
        ];
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2, 3]), &links, &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::Resolved { path, forced_linear, coverage_ratio, .. } = &resolution.structures[0].status
        else {
            panic!("expected a resolved structure");
        };
        assert!(*forced_linear);
        assert_eq!(path.path_type, PathType::Linear);
        // starts at the longer one-sided contig (3) and walks back to 1
        let ids: Vec<u32> = path.steps.iter().map(|s| s.contig.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!((coverage_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_contig_structure() {
        let contigs = table(&[(16000, 30.0)]);
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1]), &[], &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::Resolved { path, coverage_ratio, .. } = &resolution.structures[0].status else {
            panic!("expected a resolved structure");
        };
        assert_eq!(path.length, 16000);
        assert_eq!(*coverage_ratio, 1.0);
        assert_eq!(resolution.assembled, vec![ContigId::new(1)]);
    }

    #[test]
    fn test_shallow_isolated_contig_skipped() {
        let contigs = table(&[(16000, 30.0), (500, 1.0)]);
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2]), &[], &BTreeSet::new(), 2.0)
            .unwrap();
        assert_eq!(
            resolution.structures[1].status,
            StructureStatus::Skipped { reason: SkipReason::BelowDepth }
        );
    }

    #[test]
    fn test_foreign_structure_skipped() {
        let contigs = table(&[(1000, 20.0), (2000, 20.0), (1500, 20.0)]);
        let interfering: BTreeSet<ContigId> = (1..=3).map(ContigId::new).collect();
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2, 3]), &cycle(), &interfering, 2.0)
            .unwrap();
        assert_eq!(
            resolution.structures[0].status,
            StructureStatus::Skipped { reason: SkipReason::Foreign }
        );
        assert!(!resolution.is_success());
    }

    #[test]
    fn test_reference_depth_raised_below_filter() {
        let contigs = table(&[(1000, 2.0)]);
        let structures = decompose(&[ContigId::new(1)], &[]);
        let depth = reference_depth(&structures, &contigs, &BTreeSet::new(), 3.0);
        assert!((depth - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_is_foreign() {
        let contigs = table(&[(1000, 20.0), (1000, 20.0), (1000, 20.0), (1000, 20.0)]);
        let interfering: BTreeSet<ContigId> = [ContigId::new(1), ContigId::new(2)].into_iter().collect();
        let internal = vec![Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0)];
        assert!(is_foreign(&internal, &interfering, &contigs));
        assert!(!is_foreign(&internal, &BTreeSet::new(), &contigs));

        // a short target contig hanging off interfering sequence does not bridge
        let mut dangling = internal.clone();
        dangling.push(Link::between(2, Terminus::Tail, 3, Terminus::Head, 5.0));
        assert!(is_foreign(&dangling, &interfering, &contigs));

        let mut anchored = dangling.clone();
        anchored.push(Link::between(3, Terminus::Tail, 4, Terminus::Head, 5.0));
        assert!(!is_foreign(&anchored, &interfering, &contigs));
    }

    #[test]
    fn test_long_target_contig_bridges_alone() {
        let contigs = table(&[(1000, 20.0), (1000, 20.0), (2500, 20.0)]);
        let interfering: BTreeSet<ContigId> = [ContigId::new(1), ContigId::new(2)].into_iter().collect();
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0),
            Link::between(3, Terminus::Tail, 2, Terminus::Tail, 5.0),
        ];
        assert!(!is_foreign(&links, &interfering, &contigs));
    }

    #[test]
    fn test_self_link_resolves_in_either_endpoint_order() {
        let contigs = table(&[(16000, 20.0)]);
        for link in [
            Link::between(1, Terminus::Tail, 1, Terminus::Head, 10.0),
            Link::between(1, Terminus::Head, 1, Terminus::Tail, 10.0),
        ] {
            let resolution = plant_resolver()
                .resolve(&contigs, &seeds(&[1]), &[link], &BTreeSet::new(), 2.0)
                .unwrap();
            let StructureStatus::Resolved { path, coverage_ratio, .. } = &resolution.structures[0].status else {
                panic!("expected a resolved structure, got {:?}", resolution.structures[0].status);
            };
            assert_eq!(path.path_type, PathType::Circular);
            assert_eq!(path.length, 16000);
            assert!((coverage_ratio - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_dead_end_start_retries_swapped_termini() {
        // entering 1 through Head leaves through a bare Tail; the high
        // start ratio must not suppress the swapped run
        let contigs = table(&[(8000, 20.0), (1000, 20.0)]);
        let links = vec![
            Link::between(1, Terminus::Head, 2, Terminus::Tail, 10.0),
            Link::between(1, Terminus::Head, 1, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 2, Terminus::Head, 10.0),
        ];
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2]), &links, &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::Resolved { path, coverage_ratio, forced_linear, .. } = &resolution.structures[0].status
        else {
            panic!("expected a resolved structure, got {:?}", resolution.structures[0].status);
        };
        assert!(!*forced_linear);
        assert_eq!(path.path_type, PathType::Linear);
        assert_eq!(
            path.steps,
            vec![
                PathStep::new(ContigId::new(1), Terminus::Tail),
                PathStep::new(ContigId::new(2), Terminus::Tail),
            ]
        );
        assert!((coverage_ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_ratio_retry_keeps_better_orientation() {
        let contigs = table(&[(3000, 20.0), (1000, 20.0), (2000, 20.0), (2500, 20.0)]);
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 2, Terminus::Tail, 10.0),
            Link::between(1, Terminus::Head, 3, Terminus::Tail, 10.0),
            Link::between(3, Terminus::Head, 4, Terminus::Tail, 10.0),
            Link::between(4, Terminus::Tail, 4, Terminus::Tail, 10.0),
        ];
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2, 3, 4]), &links, &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::Resolved { path, coverage_ratio, forced_linear, .. } = &resolution.structures[0].status
        else {
            panic!("expected a resolved structure, got {:?}", resolution.structures[0].status);
        };
        assert!(!*forced_linear);
        // Head first reaches only 1 -> 2 (4000 of 8500); Tail first reaches 1 -> 3 -> 4
        let ids: Vec<u32> = path.steps.iter().map(|s| s.contig.get()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(path.steps[0].terminus, Terminus::Tail);
        assert!((coverage_ratio - 7500.0 / 8500.0).abs() < 1e-9);
    }

    #[test]
    fn test_both_orientations_below_floor_is_no_path() {
        // 1 -> 2 is the only walk; 3..=25 hang off the Head of 2 and are
        // never reachable
        let mut specs = vec![(1000, 20.0)];
        specs.extend(std::iter::repeat((900, 20.0)).take(24));
        let contigs = table(&specs);
        let mut links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(1, Terminus::Tail, 1, Terminus::Tail, 10.0),
            Link::between(2, Terminus::Head, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Head, 3, Terminus::Head, 10.0),
        ];
        links.extend((3..25).map(|i| Link::between(i, Terminus::Tail, i + 1, Terminus::Head, 10.0)));
        links.push(Link::between(25, Terminus::Tail, 25, Terminus::Tail, 10.0));
        let ids: Vec<u32> = (1..=25).collect();

        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&ids), &links, &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::NoPath { coverage_ratio, failure } = &resolution.structures[0].status else {
            panic!("expected no path, got {:?}", resolution.structures[0].status);
        };
        // the walk itself succeeded; only the ratio floor rejected it
        assert_eq!(*failure, None);
        assert!((coverage_ratio - 1900.0 / 22600.0).abs() < 1e-9);
        assert!(!resolution.is_success());
    }

    #[test]
    fn test_forced_linear_keeps_first_orientation() {
        // no ambiguous contig: the whole star is searched from its longest
        // one-sided contig, below the retry ratio
        let contigs = table(&[(500, 20.0), (3000, 20.0), (2500, 20.0)]);
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(1, Terminus::Tail, 3, Terminus::Head, 10.0),
        ];
        let resolution = plant_resolver()
            .resolve(&contigs, &seeds(&[1, 2, 3]), &links, &BTreeSet::new(), 2.0)
            .unwrap();
        let StructureStatus::Resolved { path, coverage_ratio, forced_linear, .. } = &resolution.structures[0].status
        else {
            panic!("expected a resolved structure, got {:?}", resolution.structures[0].status);
        };
        assert!(*forced_linear);
        assert_eq!(
            path.steps,
            vec![
                PathStep::new(ContigId::new(2), Terminus::Tail),
                PathStep::new(ContigId::new(1), Terminus::Tail),
            ]
        );
        assert!(*coverage_ratio < 0.7);
        assert!((coverage_ratio - 3500.0 / 6000.0).abs() < 1e-9);
    }
}
