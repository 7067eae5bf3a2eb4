//! Arena-indexed backbone adjacency.

use std::collections::{BTreeMap, BTreeSet};

use crate::backbone::Backbone;
use crate::types::{ContigId, ContigTable, LinkEnd, Terminus};

/// Role of a backbone contig in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Target-organelle contig: budgeted, counts toward coverage.
    Target,
    /// Other-organelle contig: at most one pass during deep search.
    Interfering,
    /// Neither: a single pass, no coverage.
    Other,
}

/// A successor reachable from one side of a contig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    /// Arena index of the successor.
    pub idx: usize,
    /// Terminus the successor is entered through.
    pub entry: Terminus,
}

/// Error building the adjacency.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeExceeded {
    /// Offending contig.
    pub contig: ContigId,
    /// Neighbours on the offending side.
    pub degree: usize,
}

/// Backbone adjacency: node index to Head-side and Tail-side successors.
#[derive(Debug, Clone)]
pub struct BackboneArena {
    ids: Vec<ContigId>,
    index: BTreeMap<ContigId, usize>,
    kinds: Vec<NodeKind>,
    lengths: Vec<u64>,
    depths: Vec<f64>,
    sides: Vec<[Vec<Neighbour>; 2]>,
}

impl BackboneArena {
    /// Build the adjacency for a backbone.
    ///
    /// Successors on each side are ordered target contigs first (deepest
    /// first), then the rest in link order. A self-link joining both
    /// termini is walkable from either side; a hairpin that returns to the
    /// terminus it left is recorded once.
    pub fn build(
        backbone: &Backbone,
        contigs: &ContigTable,
        targets: &BTreeSet<ContigId>,
        interfering: &BTreeSet<ContigId>,
        max_side_degree: usize,
    ) -> Result<Self, DegreeExceeded> {
        let mut ids = Vec::with_capacity(backbone.nodes.len());
        let mut index = BTreeMap::new();
        for &id in &backbone.nodes {
            if !index.contains_key(&id) {
                index.insert(id, ids.len());
                ids.push(id);
            }
        }

        let kinds: Vec<NodeKind> = ids
            .iter()
            .map(|id| {
                if interfering.contains(id) {
                    NodeKind::Interfering
                } else if targets.contains(id) {
                    NodeKind::Target
                } else {
                    NodeKind::Other
                }
            })
            .collect();
        let lengths = ids.iter().map(|&id| contigs.length(id)).collect();
        let depths = ids.iter().map(|&id| contigs.depth(id)).collect();

        let mut sides: Vec<[Vec<Neighbour>; 2]> = vec![Default::default(); ids.len()];
        let mut attach = |from: LinkEnd, to: LinkEnd| {
            if let (Some(&a), Some(&b)) = (index.get(&from.contig), index.get(&to.contig)) {
                sides[a][from.terminus.side()].push(Neighbour {
                    idx: b,
                    entry: to.terminus,
                });
            }
        };
        for link in &backbone.links {
            attach(link.left, link.right);
            if link.left != link.right {
                attach(link.right, link.left);
            }
        }

        let mut arena = Self {
            ids,
            index,
            kinds,
            lengths,
            depths,
            sides,
        };
        arena.order_sides();

        for (idx, sides) in arena.sides.iter().enumerate() {
            let degree = sides[0].len().max(sides[1].len());
            if degree > max_side_degree {
                return Err(DegreeExceeded {
                    contig: arena.ids[idx],
                    degree,
                });
            }
        }
        Ok(arena)
    }

    fn order_sides(&mut self) {
        let kinds = &self.kinds;
        let depths = &self.depths;
        for side in self.sides.iter_mut().flat_map(|s| s.iter_mut()) {
            let (mut first, rest): (Vec<Neighbour>, Vec<Neighbour>) =
                std::mem::take(side).into_iter().partition(|n| kinds[n.idx] == NodeKind::Target);
            first.sort_by(|a, b| {
                depths[b.idx]
                    .partial_cmp(&depths[a.idx])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            first.extend(rest);
            *side = first;
        }
    }

    /// Arena index of a contig.
    pub fn index_of(&self, id: ContigId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Contig at an index.
    pub fn id(&self, idx: usize) -> ContigId {
        self.ids[idx]
    }

    /// Role of the contig at an index.
    pub fn kind(&self, idx: usize) -> NodeKind {
        self.kinds[idx]
    }

    /// Length of the contig at an index.
    pub fn length(&self, idx: usize) -> u64 {
        self.lengths[idx]
    }

    /// Depth of the contig at an index.
    pub fn depth(&self, idx: usize) -> f64 {
        self.depths[idx]
    }

    /// Successors reached by leaving `idx` through `exit`.
    pub fn neighbours(&self, idx: usize, exit: Terminus) -> &[Neighbour] {
        &self.sides[idx][exit.side()]
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Sum of target contig lengths: the coverage denominator.
    pub fn target_length(&self) -> u64 {
        (0..self.len())
            .filter(|&i| self.kinds[i] == NodeKind::Target)
            .map(|i| self.lengths[i])
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Contig, Link};

    fn table(depths: &[f64]) -> ContigTable {
        ContigTable::from_contigs(
            depths
                .iter()
                .enumerate()
                .map(|(i, &d)| Contig::new(ContigId::new(i as u32 + 1), format!("c{i}"), 1000, d))
                .collect(),
        )
        .unwrap()
    }

    fn backbone(nodes: &[u32], links: Vec<Link>) -> Backbone {
        Backbone {
            nodes: nodes.iter().copied().map(ContigId::new).collect(),
            links,
        }
    }

    #[test]
    fn test_symmetric_adjacency() {
        let contigs = table(&[10.0, 10.0]);
        let bb = backbone(&[1, 2], vec![Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0)]);
        let all: BTreeSet<ContigId> = bb.node_set();
        let arena = BackboneArena::build(&bb, &contigs, &all, &BTreeSet::new(), 9).unwrap();

        assert_eq!(arena.neighbours(0, Terminus::Tail), &[Neighbour { idx: 1, entry: Terminus::Head }]);
        assert_eq!(arena.neighbours(1, Terminus::Head), &[Neighbour { idx: 0, entry: Terminus::Tail }]);
        assert!(arena.neighbours(0, Terminus::Head).is_empty());
    }

    #[test]
    fn test_neighbour_order() {
        let contigs = table(&[10.0, 5.0, 50.0, 30.0]);
        let bb = backbone(
            &[1, 2, 3, 4],
            vec![
                Link::between(1, Terminus::Tail, 3, Terminus::Head, 5.0),
                Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0),
                Link::between(1, Terminus::Tail, 4, Terminus::Head, 5.0),
            ],
        );
        let targets = bb.node_set();
        let interfering: BTreeSet<ContigId> = [ContigId::new(3)].into_iter().collect();
        let arena = BackboneArena::build(&bb, &contigs, &targets, &interfering, 9).unwrap();

        let order: Vec<ContigId> = arena
            .neighbours(0, Terminus::Tail)
            .iter()
            .map(|n| arena.id(n.idx))
            .collect();
        assert_eq!(order, vec![ContigId::new(4), ContigId::new(2), ContigId::new(3)]);
        assert_eq!(arena.kind(2), NodeKind::Interfering);
        assert_eq!(arena.target_length(), 3000);
    }

    #[test]
    fn test_self_link_walkable_in_both_orders() {
        let contigs = table(&[10.0]);
        for link in [
            Link::between(1, Terminus::Tail, 1, Terminus::Head, 5.0),
            Link::between(1, Terminus::Head, 1, Terminus::Tail, 5.0),
        ] {
            let bb = backbone(&[1], vec![link]);
            let arena = BackboneArena::build(&bb, &contigs, &bb.node_set(), &BTreeSet::new(), 9).unwrap();
            assert_eq!(arena.neighbours(0, Terminus::Tail), &[Neighbour { idx: 0, entry: Terminus::Head }]);
            assert_eq!(arena.neighbours(0, Terminus::Head), &[Neighbour { idx: 0, entry: Terminus::Tail }]);
        }
    }

    #[test]
    fn test_hairpin_recorded_once() {
        let contigs = table(&[10.0]);
        let bb = backbone(&[1], vec![Link::between(1, Terminus::Tail, 1, Terminus::Tail, 5.0)]);
        let arena = BackboneArena::build(&bb, &contigs, &bb.node_set(), &BTreeSet::new(), 9).unwrap();
        assert_eq!(arena.neighbours(0, Terminus::Tail), &[Neighbour { idx: 0, entry: Terminus::Tail }]);
        assert!(arena.neighbours(0, Terminus::Head).is_empty());
    }

    #[test]
    fn test_degree_cap() {
        let contigs = table(&[10.0; 12]);
        let links: Vec<Link> = (2..=11)
            .map(|i| Link::between(1, Terminus::Tail, i, Terminus::Head, 5.0))
            .collect();
        let nodes: Vec<u32> = (1..=11).collect();
        let bb = backbone(&nodes, links);
        let err = BackboneArena::build(&bb, &contigs, &bb.node_set(), &BTreeSet::new(), 9).unwrap_err();
        assert_eq!(err, DegreeExceeded { contig: ContigId::new(1), degree: 10 });
    }
}
