//! Two-phase organelle pipeline.
//!
//! Plant mitochondrial runs resolve the plastid first and treat its
//! backbone contigs as interfering sequence. Every other run is a single
//! phase.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::info;

use crate::hits::HitSeeder;
use crate::policy::{Organelle, ResolvePolicyV1, Taxon};
use crate::report::{PhaseReport, RunReport};
use crate::resolver::{PathResolver, ResolveError};
use crate::seed::{SeedGrowthEngine, SeedSet};
use crate::store::GraphStore;
use crate::types::{ContigId, SimilarityHit};

/// Similarity hits consumed by a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineHits {
    /// Contigs against mitochondrial marker genes.
    pub markers: Vec<SimilarityHit>,
    /// Contigs against a plastid reference.
    pub plastid: Vec<SimilarityHit>,
    /// Contig end-to-start junctions against the contigs.
    pub junctions: Vec<SimilarityHit>,
}

/// Runs seed selection, growth and resolution over a graph store.
pub struct OrganellePipeline<S: GraphStore> {
    store: Arc<S>,
    policy: ResolvePolicyV1,
}

impl<S: GraphStore> OrganellePipeline<S> {
    /// Create a pipeline over a store.
    pub fn new(store: Arc<S>, policy: ResolvePolicyV1) -> Self {
        Self { store, policy }
    }

    /// Policy in use.
    pub fn policy(&self) -> &ResolvePolicyV1 {
        &self.policy
    }

    /// Resolve the requested organelle.
    ///
    /// Fails only when seed growth does not converge or a search
    /// precondition is violated.
    pub fn run(&self, hits: &PipelineHits) -> Result<RunReport, ResolveError> {
        let mut phases = Vec::new();

        let two_phase = self.policy.organelle == Organelle::Mitochondrion
            && self.policy.taxon == Taxon::Plant
            && !hits.plastid.is_empty();
        let interfering: BTreeSet<ContigId> = if two_phase {
            let plastid = self.resolve_phase(Organelle::Plastid, hits, &BTreeSet::new())?;
            let set = plastid.resolution.backbone_nodes.iter().copied().collect();
            phases.push(plastid);
            set
        } else {
            BTreeSet::new()
        };

        phases.push(self.resolve_phase(self.policy.organelle, hits, &interfering)?);
        let report = RunReport::new(&self.policy, phases);
        info!(
            organelle = %report.organelle,
            success = report.is_success(),
            assembled = report.assembled().len(),
            fingerprint = %report.fingerprint,
            "Run finished"
        );
        Ok(report)
    }

    fn resolve_phase(
        &self,
        organelle: Organelle,
        hits: &PipelineHits,
        interfering: &BTreeSet<ContigId>,
    ) -> Result<PhaseReport, ResolveError> {
        let contigs = self.store.contigs();
        let links = self.store.links();
        let taxon = self.policy.taxon;
        let seeder = HitSeeder::new(contigs, &self.policy.hits);
        let base_filter = self.policy.plant_link_filter();

        let candidates = match organelle {
            Organelle::Plastid => seeder.plastid_seeds(&hits.plastid, base_filter),
            Organelle::Mitochondrion => seeder.marker_seeds(&hits.markers, taxon, base_filter),
        };
        let initial: SeedSet = candidates.iter().map(|c| c.contig).collect();
        let link_filter = match (organelle, taxon) {
            (Organelle::Mitochondrion, Taxon::Plant) => base_filter,
            _ => ResolvePolicyV1::seeded_link_filter(initial.first().map_or(0.0, |id| contigs.depth(id))),
        };

        info!(
            organelle = %organelle,
            seeds = initial.len(),
            link_filter = link_filter,
            interfering = interfering.len(),
            "Phase started"
        );

        let growth = SeedGrowthEngine::new(self.policy.seed.clone()).expand(
            links,
            contigs,
            initial.clone(),
            link_filter,
        )?;
        let mut phase_links = growth.links;
        let junctions = seeder.junction_links(&hits.junctions, &growth.seeds, &phase_links);
        let junction_links = junctions.len();
        phase_links.extend(junctions);

        let resolver = PathResolver::new(ResolvePolicyV1 {
            organelle,
            ..self.policy.clone()
        });
        let resolution = resolver.resolve(contigs, &growth.seeds, &phase_links, interfering, link_filter)?;

        Ok(PhaseReport {
            organelle,
            initial_seeds: initial.as_slice().to_vec(),
            seeds: growth.seeds.as_slice().to_vec(),
            pruned: growth.pruned,
            growth_rounds: growth.rounds,
            link_filter,
            junction_links,
            resolution,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryGraphStore;
    use crate::types::{Contig, Link, Terminus};

    fn hit(query: &str, target: &str, identity: f64, align_len: u64) -> SimilarityHit {
        SimilarityHit {
            query: query.to_string(),
            target: target.to_string(),
            identity,
            align_len,
            mismatches: 0,
            gaps: 0,
            q_start: 1,
            q_end: align_len,
            s_start: 1,
            s_end: align_len,
            evalue: 0.0,
            bit_score: 500.0,
        }
    }

    /// Mito cycle 1-2-3 at depth 20, plastid cycle 4-5-6 at depth 200.
    fn store() -> InMemoryGraphStore {
        let mut store = InMemoryGraphStore::new();
        let specs = [(1, 8000, 20.0), (2, 6000, 20.0), (3, 5000, 20.0), (4, 9000, 200.0), (5, 7000, 200.0), (6, 4000, 200.0)];
        for (id, len, depth) in specs {
            store
                .add_contig(Contig::new(ContigId::new(id), format!("contig{id}"), len, depth))
                .unwrap();
        }
        for (a, b, support) in [(1, 2, 15.0), (2, 3, 15.0), (3, 1, 15.0), (4, 5, 150.0), (5, 6, 150.0), (6, 4, 150.0)] {
            store.add_link(Link::between(a, Terminus::Tail, b, Terminus::Head, support)).unwrap();
        }
        store
    }

    #[test]
    fn test_plant_run_resolves_plastid_first() {
        let hits = PipelineHits {
            markers: vec![
                hit("contig1", "x_cox1", 99.0, 1500),
                hit("contig1", "x_nad5", 99.0, 1800),
                hit("contig2", "x_atp1", 99.0, 1400),
            ],
            plastid: vec![hit("contig4", "psbA", 99.0, 3000)],
            junctions: Vec::new(),
        };
        let mut policy = ResolvePolicyV1::minimal();
        policy.base_depth = 5.0;
        let pipeline = OrganellePipeline::new(Arc::new(store()), policy);
        let report = pipeline.run(&hits).unwrap();

        assert_eq!(report.phases.len(), 2);
        assert_eq!(report.phases[0].organelle, Organelle::Plastid);
        let plastid: BTreeSet<ContigId> = report.phases[0].seeds.iter().copied().collect();
        assert_eq!(plastid, (4..=6).map(ContigId::new).collect());

        assert!(report.is_success());
        let mito: BTreeSet<ContigId> = report.assembled().iter().copied().collect();
        assert_eq!(mito, (1..=3).map(ContigId::new).collect());
    }

    #[test]
    fn test_missing_hits_yield_empty_report() {
        let pipeline = OrganellePipeline::new(Arc::new(store()), ResolvePolicyV1::minimal());
        let report = pipeline.run(&PipelineHits::default()).unwrap();
        assert_eq!(report.phases.len(), 1);
        assert!(report.phases[0].seeds.is_empty());
        assert!(!report.is_success());
    }
}
