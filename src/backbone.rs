//! Backbone simplification.
//!
//! A structure is reduced to the contigs whose orientation is ambiguous:
//! those entered from both termini, or carrying a self-link. Links whose
//! endpoints are not ambiguous, too shallow, or excluded are dropped, and
//! the scan repeats until the link set stops shrinking.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::structure::Structure;
use crate::types::{ContigId, ContigTable, Link, Terminus};

/// Simplified node/link subset of a structure used for path search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backbone {
    /// Contigs in first-appearance order.
    pub nodes: Vec<ContigId>,
    /// Retained links.
    pub links: Vec<Link>,
}

impl Backbone {
    /// The whole structure, used when simplification collapses.
    pub fn from_structure(structure: &Structure) -> Self {
        Self {
            nodes: structure.nodes.clone(),
            links: structure.links.clone(),
        }
    }

    /// Whether the backbone has no contigs.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the contig is on the backbone.
    pub fn contains(&self, id: ContigId) -> bool {
        self.nodes.contains(&id)
    }

    /// Contigs in id order.
    pub fn node_set(&self) -> BTreeSet<ContigId> {
        self.nodes.iter().copied().collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Orientation {
    head: bool,
    tail: bool,
    looped: bool,
}

impl Orientation {
    fn see(&mut self, terminus: Terminus) {
        match terminus {
            Terminus::Head => self.head = true,
            Terminus::Tail => self.tail = true,
        }
    }

    fn ambiguous(&self) -> bool {
        self.looped || (self.head && self.tail)
    }
}

/// Contigs that appear with both termini or on a self-link, in
/// first-appearance order.
pub fn ambiguous_nodes(links: &[Link]) -> Vec<ContigId> {
    let mut seen: BTreeMap<ContigId, Orientation> = BTreeMap::new();
    let mut order = Vec::new();
    for link in links {
        for end in [link.left, link.right] {
            seen.entry(end.contig).or_insert_with(|| {
                order.push(end.contig);
                Orientation::default()
            });
        }
        if link.is_self_link() {
            if let Some(o) = seen.get_mut(&link.left.contig) {
                o.looped = true;
            }
        } else {
            for end in [link.left, link.right] {
                if let Some(o) = seen.get_mut(&end.contig) {
                    o.see(end.terminus);
                }
            }
        }
    }
    order
        .into_iter()
        .filter(|id| seen.get(id).map_or(false, Orientation::ambiguous))
        .collect()
}

/// Reduce a structure's links to its backbone.
///
/// Returns an empty backbone when no contig is ambiguous; the caller
/// decides whether to fall back to the whole structure.
pub fn simplify(
    links: &[Link],
    contigs: &ContigTable,
    excluded: &BTreeSet<ContigId>,
    depth_filter: f64,
) -> Backbone {
    let mut current: Vec<Link> = links.to_vec();
    let mut round = 0usize;
    loop {
        round += 1;
        let nodes = ambiguous_nodes(&current);
        if nodes.is_empty() {
            debug!(round = round, "Backbone collapsed");
            return Backbone::default();
        }
        let members: BTreeSet<ContigId> = nodes.iter().copied().collect();

        let retained: Vec<Link> = current
            .iter()
            .filter(|link| {
                link.contigs().iter().all(|id| {
                    members.contains(id)
                        && !excluded.contains(id)
                        && contigs.depth(*id) >= depth_filter
                })
            })
            .cloned()
            .collect();

        if retained.len() == current.len() {
            debug!(
                round = round,
                nodes = nodes.len(),
                links = retained.len(),
                "Backbone converged"
            );
            return Backbone {
                nodes,
                links: retained,
            };
        }
        current = retained;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Contig;

    fn table(n: usize, depth: f64) -> ContigTable {
        ContigTable::from_contigs(
            (1..=n as u32)
                .map(|id| Contig::new(ContigId::new(id), format!("c{id}"), 1000, depth))
                .collect(),
        )
        .unwrap()
    }

    fn ids(v: &[u32]) -> Vec<ContigId> {
        v.iter().copied().map(ContigId::new).collect()
    }

    fn cycle() -> Vec<Link> {
        vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 3, Terminus::Head, 10.0),
            Link::between(3, Terminus::Tail, 1, Terminus::Head, 10.0),
        ]
    }

    #[test]
    fn test_cycle_is_its_own_backbone() {
        let backbone = simplify(&cycle(), &table(3, 20.0), &BTreeSet::new(), 2.0);
        assert_eq!(backbone.nodes, ids(&[1, 2, 3]));
        assert_eq!(backbone.links.len(), 3);
    }

    #[test]
    fn test_chain_collapses() {
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
            Link::between(2, Terminus::Tail, 3, Terminus::Head, 10.0),
        ];
        // 2 is ambiguous; 1 and 3 are not, so no link survives and 2 is
        // then alone.
        let backbone = simplify(&links, &table(3, 20.0), &BTreeSet::new(), 2.0);
        assert!(backbone.is_empty());
    }

    #[test]
    fn test_self_link_is_ambiguous() {
        let links = vec![Link::between(1, Terminus::Tail, 1, Terminus::Head, 10.0)];
        assert_eq!(ambiguous_nodes(&links), ids(&[1]));
        let backbone = simplify(&links, &table(1, 20.0), &BTreeSet::new(), 2.0);
        assert_eq!(backbone.nodes, ids(&[1]));
        assert_eq!(backbone.links.len(), 1);
    }

    #[test]
    fn test_dangling_tip_trimmed() {
        let mut links = cycle();
        links.push(Link::between(3, Terminus::Tail, 4, Terminus::Head, 10.0));
        let backbone = simplify(&links, &table(4, 20.0), &BTreeSet::new(), 2.0);
        assert_eq!(backbone.nodes, ids(&[1, 2, 3]));
        assert_eq!(backbone.links.len(), 3);
    }

    #[test]
    fn test_depth_filter_and_exclusion() {
        let contigs = table(3, 20.0);
        assert!(simplify(&cycle(), &contigs, &BTreeSet::new(), 25.0).is_empty());

        let excluded: BTreeSet<ContigId> = ids(&[2]).into_iter().collect();
        assert!(simplify(&cycle(), &contigs, &excluded, 2.0).is_empty());
    }
}
