//! Seed growth and bubble pruning.
//!
//! Starting from a handful of marker-bearing contigs, the seed set grows
//! along well-supported links until a scan of the full link list adds
//! nothing. Short contigs that only form a redundant alternate path
//! between two already-adjacent neighbours are then pruned.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::policy::SeedPolicy;
use crate::types::{ContigId, ContigTable, Link};

/// Error type for seed growth.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeedError {
    /// Growth still added contigs after the round cap.
    #[error("Seed growth did not converge within {rounds} rounds ({seeds} seeds)")]
    NonConvergent {
        /// Rounds executed.
        rounds: u32,
        /// Seed count when growth was abandoned.
        seeds: usize,
    },
}

/// Insertion-ordered set of seed contigs.
///
/// The first element is the top-ranked hit seed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    order: Vec<ContigId>,
    members: BTreeSet<ContigId>,
}

impl SeedSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a contig. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ContigId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Whether the contig is a seed.
    pub fn contains(&self, id: ContigId) -> bool {
        self.members.contains(&id)
    }

    /// Number of seeds.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The first seed added.
    pub fn first(&self) -> Option<ContigId> {
        self.order.first().copied()
    }

    /// Seeds in insertion order.
    pub fn as_slice(&self) -> &[ContigId] {
        &self.order
    }

    /// Seeds in id order.
    pub fn members(&self) -> &BTreeSet<ContigId> {
        &self.members
    }

    /// Remove every contig in `removed`, keeping the order of the rest.
    pub fn remove_all(&mut self, removed: &BTreeSet<ContigId>) {
        self.order.retain(|id| !removed.contains(id));
        self.members.retain(|id| !removed.contains(id));
    }

    /// Whether every seed of `self` is also in `other`.
    pub fn is_subset(&self, other: &SeedSet) -> bool {
        self.members.is_subset(&other.members)
    }
}

impl FromIterator<ContigId> for SeedSet {
    fn from_iter<I: IntoIterator<Item = ContigId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Result of growing and pruning a seed set.
#[derive(Debug, Clone)]
pub struct GrowthOutcome {
    /// Final seeds.
    pub seeds: SeedSet,
    /// Relaxed link set among the final seeds.
    pub links: Vec<Link>,
    /// Growth rounds executed, including the final empty one.
    pub rounds: u32,
    /// Contigs removed by bubble pruning.
    pub pruned: Vec<ContigId>,
}

/// Grows a seed set along depth-filtered links.
#[derive(Debug, Clone, Default)]
pub struct SeedGrowthEngine {
    policy: SeedPolicy,
}

impl SeedGrowthEngine {
    /// Create an engine with the given thresholds.
    pub fn new(policy: SeedPolicy) -> Self {
        Self { policy }
    }

    /// Grow, build the relaxed link set, then prune bubbles.
    pub fn expand(
        &self,
        links: &[Link],
        contigs: &ContigTable,
        seeds: SeedSet,
        link_depth_filter: f64,
    ) -> Result<GrowthOutcome, SeedError> {
        let (seeds, rounds) = self.grow(links, contigs, seeds, link_depth_filter)?;
        let seed_links = self.seed_links(links, contigs, &seeds);
        let (seeds, links, pruned) = self.prune_bubbles(seeds, seed_links, contigs);

        info!(
            seeds = seeds.len(),
            links = links.len(),
            rounds = rounds,
            pruned = pruned.len(),
            "Seed growth converged"
        );

        Ok(GrowthOutcome {
            seeds,
            links,
            rounds,
            pruned,
        })
    }

    /// Re-scan `links` until a round adds nothing.
    ///
    /// Returns the grown set and the number of rounds executed. Fails if
    /// the round cap is reached while seeds are still being added.
    pub fn grow(
        &self,
        links: &[Link],
        contigs: &ContigTable,
        mut seeds: SeedSet,
        link_depth_filter: f64,
    ) -> Result<(SeedSet, u32), SeedError> {
        for round in 1..=self.policy.max_rounds {
            let added = self.grow_round(links, contigs, &mut seeds, link_depth_filter);
            debug!(round = round, added = added, seeds = seeds.len(), "Seed growth round");
            if added == 0 {
                return Ok((seeds, round));
            }
        }
        Err(SeedError::NonConvergent {
            rounds: self.policy.max_rounds,
            seeds: seeds.len(),
        })
    }

    /// One scan of the link list. Seeds added during the scan are visible
    /// to later links of the same scan. Returns the number added.
    pub fn grow_round(
        &self,
        links: &[Link],
        contigs: &ContigTable,
        seeds: &mut SeedSet,
        link_depth_filter: f64,
    ) -> usize {
        let mut added = 0;
        for link in links {
            let [left, right] = link.contigs();
            let (dl, dr) = (contigs.depth(left), contigs.depth(right));
            if dl <= link_depth_filter || dr <= link_depth_filter {
                continue;
            }
            if link.depth < self.policy.growth_link_ratio * dl.min(dr) {
                continue;
            }
            match (seeds.contains(left), seeds.contains(right)) {
                (true, false) => added += usize::from(seeds.insert(right)),
                (false, true) => added += usize::from(seeds.insert(left)),
                _ => {}
            }
        }
        added
    }

    /// Links among seeds whose depth exceeds the relaxed ratio of the
    /// smaller endpoint depth.
    pub fn seed_links(&self, links: &[Link], contigs: &ContigTable, seeds: &SeedSet) -> Vec<Link> {
        links
            .iter()
            .filter(|link| {
                let [left, right] = link.contigs();
                seeds.contains(left)
                    && seeds.contains(right)
                    && link.depth
                        > self.policy.bfs_link_ratio * contigs.depth(left).min(contigs.depth(right))
            })
            .cloned()
            .collect()
    }

    /// Remove short redundant contigs until a round removes nothing.
    ///
    /// Returns the remaining seeds, the remaining links and the pruned
    /// contigs in removal order.
    pub fn prune_bubbles(
        &self,
        mut seeds: SeedSet,
        mut links: Vec<Link>,
        contigs: &ContigTable,
    ) -> (SeedSet, Vec<Link>, Vec<ContigId>) {
        let mut pruned = Vec::new();
        loop {
            let sides = SideNeighbours::build(&links);
            let marked: BTreeSet<ContigId> = seeds
                .as_slice()
                .iter()
                .copied()
                .filter(|&id| contigs.length(id) <= self.policy.bubble_max_len)
                .filter(|&id| sides.is_bubble(id))
                .collect();

            if marked.is_empty() {
                return (seeds, links, pruned);
            }

            debug!(removed = ?marked, "Pruning bubble contigs");
            seeds.remove_all(&marked);
            links.retain(|link| !link.contigs().iter().any(|id| marked.contains(id)));
            pruned.extend(marked);
        }
    }
}

/// Link entries per contig, split by the terminus the link attaches to.
///
/// Parallel links each count as an entry. Self-links are not recorded; a
/// contig carrying one is never a bubble.
struct SideNeighbours {
    /// `[head_side, tail_side]` per contig.
    sides: BTreeMap<ContigId, [Vec<ContigId>; 2]>,
    looped: BTreeSet<ContigId>,
}

impl SideNeighbours {
    fn build(links: &[Link]) -> Self {
        let mut sides: BTreeMap<ContigId, [Vec<ContigId>; 2]> = BTreeMap::new();
        let mut looped = BTreeSet::new();
        for link in links {
            if link.is_self_link() {
                looped.insert(link.left.contig);
                continue;
            }
            sides.entry(link.left.contig).or_default()[link.left.terminus.side()].push(link.right.contig);
            sides.entry(link.right.contig).or_default()[link.right.terminus.side()].push(link.left.contig);
        }
        Self { sides, looped }
    }

    fn single(side: &[ContigId]) -> Option<ContigId> {
        match side {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Either side of `of` holds both `a` and `b`.
    fn shares_side(&self, of: ContigId, a: ContigId, b: ContigId) -> bool {
        self.sides
            .get(&of)
            .map_or(false, |s| s.iter().any(|side| side.contains(&a) && side.contains(&b)))
    }

    fn is_bubble(&self, id: ContigId) -> bool {
        if self.looped.contains(&id) {
            return false;
        }
        let Some([head, tail]) = self.sides.get(&id) else {
            return false;
        };
        let (Some(h), Some(t)) = (Self::single(head), Self::single(tail)) else {
            return false;
        };
        self.shares_side(t, id, h) && self.shares_side(h, id, t)
    }
}
