//! In-memory contig graph.

use crate::types::{Contig, ContigId, ContigTable, Link};
use super::GraphStore;

/// Error building an in-memory graph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InMemoryError {
    /// Contig ids must be 1, 2, 3, ... in insertion order.
    #[error("Contig id {0} breaks the dense id sequence")]
    NonDenseId(ContigId),
    /// A link references a contig that was never added.
    #[error("Link references unknown contig {0}")]
    UnknownContig(ContigId),
}

/// Contig table plus the raw link list produced by the assembler.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    contigs: ContigTable,
    links: Vec<Link>,
}

impl InMemoryGraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next contig.
    pub fn add_contig(&mut self, contig: Contig) -> Result<(), InMemoryError> {
        self.contigs.push(contig).map_err(InMemoryError::NonDenseId)
    }

    /// Add a link. Both endpoints must already be present.
    pub fn add_link(&mut self, link: Link) -> Result<(), InMemoryError> {
        for id in link.contigs() {
            if !self.contigs.contains(id) {
                return Err(InMemoryError::UnknownContig(id));
            }
        }
        self.links.push(link);
        Ok(())
    }

    /// Number of contigs.
    pub fn num_contigs(&self) -> usize {
        self.contigs.len()
    }

    /// Number of links.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }
}

impl GraphStore for InMemoryGraphStore {
    fn contigs(&self) -> &ContigTable {
        &self.contigs
    }

    fn links(&self) -> &[Link] {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Terminus;

    #[test]
    fn test_rejects_unknown_endpoint() {
        let mut store = InMemoryGraphStore::new();
        store.add_contig(Contig::new(ContigId::new(1), "a", 100, 5.0)).unwrap();

        let err = store
            .add_link(Link::between(1, Terminus::Tail, 2, Terminus::Head, 3.0))
            .unwrap_err();
        assert_eq!(err, InMemoryError::UnknownContig(ContigId::new(2)));
        assert_eq!(store.num_links(), 0);
    }

    #[test]
    fn test_rejects_gap_in_ids() {
        let mut store = InMemoryGraphStore::new();
        let err = store
            .add_contig(Contig::new(ContigId::new(2), "b", 100, 5.0))
            .unwrap_err();
        assert_eq!(err, InMemoryError::NonDenseId(ContigId::new(2)));
    }
}
