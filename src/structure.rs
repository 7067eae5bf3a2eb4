//! Decomposition of a link set into connected structures.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{ContigId, Link};

/// A connected component of a link set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Position in decomposition order.
    pub index: usize,
    /// Contigs in discovery order.
    pub nodes: Vec<ContigId>,
    /// Links of the component, in traversal order.
    pub links: Vec<Link>,
}

impl Structure {
    /// Whether the contig belongs to this structure.
    pub fn contains(&self, id: ContigId) -> bool {
        self.nodes.contains(&id)
    }

    /// Contigs in id order.
    pub fn node_set(&self) -> BTreeSet<ContigId> {
        self.nodes.iter().copied().collect()
    }

    /// Number of contigs.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the structure has no contigs.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Partition `links` into connected structures reachable from `nodes`.
///
/// Each not-yet-visited node (in input order) starts a depth-first
/// traversal over unused links. Every link is claimed by at most one
/// structure. A node without links becomes a single-node structure.
pub fn decompose(nodes: &[ContigId], links: &[Link]) -> Vec<Structure> {
    let mut incidence: BTreeMap<ContigId, Vec<usize>> = BTreeMap::new();
    for (idx, link) in links.iter().enumerate() {
        incidence.entry(link.left.contig).or_default().push(idx);
        if !link.is_self_link() {
            incidence.entry(link.right.contig).or_default().push(idx);
        }
    }

    let mut used = vec![false; links.len()];
    let mut visited: BTreeSet<ContigId> = BTreeSet::new();
    let mut structures = Vec::new();

    for &start in nodes {
        if !visited.insert(start) {
            continue;
        }
        let mut structure = Structure {
            index: structures.len(),
            nodes: vec![start],
            links: Vec::new(),
        };

        // (node, next incidence position to try)
        let mut stack: Vec<(ContigId, usize)> = vec![(start, 0)];
        while let Some((node, pos)) = stack.last_mut() {
            let incident = incidence.get(&*node).map(Vec::as_slice).unwrap_or(&[]);
            let next = incident[*pos..]
                .iter()
                .position(|&idx| !used[idx])
                .map(|offset| *pos + offset);
            let Some(at) = next else {
                stack.pop();
                continue;
            };
            *pos = at + 1;

            let link_idx = incident[at];
            used[link_idx] = true;
            let link = &links[link_idx];
            structure.links.push(link.clone());

            let current = *node;
            if let Some(other) = link.other_end(current) {
                if visited.insert(other.contig) {
                    structure.nodes.push(other.contig);
                }
                stack.push((other.contig, 0));
            }
        }

        debug!(
            structure = structure.index,
            nodes = structure.nodes.len(),
            links = structure.links.len(),
            "Structure found"
        );
        structures.push(structure);
    }
    structures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Terminus;

    fn ids(v: &[u32]) -> Vec<ContigId> {
        v.iter().copied().map(ContigId::new).collect()
    }

    #[test]
    fn test_two_components() {
        let links = vec![
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0),
            Link::between(3, Terminus::Tail, 4, Terminus::Head, 5.0),
            Link::between(2, Terminus::Tail, 1, Terminus::Head, 5.0),
        ];
        let structures = decompose(&ids(&[1, 2, 3, 4]), &links);
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[0].nodes, ids(&[1, 2]));
        assert_eq!(structures[0].links.len(), 2);
        assert_eq!(structures[1].nodes, ids(&[3, 4]));
        assert_eq!(structures[1].links.len(), 1);
    }

    #[test]
    fn test_isolated_node_is_own_structure() {
        let links = vec![Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0)];
        let structures = decompose(&ids(&[1, 2, 7]), &links);
        assert_eq!(structures.len(), 2);
        assert_eq!(structures[1].nodes, ids(&[7]));
        assert!(structures[1].links.is_empty());
    }

    #[test]
    fn test_self_link_and_multi_edge() {
        let links = vec![
            Link::between(1, Terminus::Tail, 1, Terminus::Head, 5.0),
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 5.0),
            Link::between(1, Terminus::Tail, 2, Terminus::Head, 6.0),
        ];
        let structures = decompose(&ids(&[1]), &links);
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].nodes, ids(&[1, 2]));
        assert_eq!(structures[0].links.len(), 3);
    }

    #[test]
    fn test_traversal_reaches_non_listed_nodes() {
        let links = vec![
            Link::between(1, Terminus::Tail, 5, Terminus::Head, 5.0),
            Link::between(5, Terminus::Tail, 6, Terminus::Head, 5.0),
        ];
        let structures = decompose(&ids(&[1, 6]), &links);
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].nodes, ids(&[1, 5, 6]));
    }
}
