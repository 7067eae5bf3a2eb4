//! Link types for the path kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::contig::{ContigId, Terminus};

/// One endpoint of a link: a contig and the terminus the link attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkEnd {
    /// Contig at this end.
    pub contig: ContigId,
    /// Terminus of the contig used by the link.
    pub terminus: Terminus,
}

impl LinkEnd {
    /// Create a new link endpoint.
    pub fn new(contig: ContigId, terminus: Terminus) -> Self {
        Self { contig, terminus }
    }
}

impl fmt::Display for LinkEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.contig, self.terminus)
    }
}

/// Unordered adjacency between two contig termini with a support depth.
///
/// Multiple links may join the same contigs. Link sets are always filtered
/// copies; stages never mutate the set they read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Left endpoint.
    pub left: LinkEnd,
    /// Right endpoint.
    pub right: LinkEnd,
    /// Read support for the adjacency.
    pub depth: f64,
}

impl Link {
    /// Create a new link.
    pub fn new(left: LinkEnd, right: LinkEnd, depth: f64) -> Self {
        Self { left, right, depth }
    }

    /// Shorthand used by graph builders and tests.
    pub fn between(
        left: u32,
        left_terminus: Terminus,
        right: u32,
        right_terminus: Terminus,
        depth: f64,
    ) -> Self {
        Self::new(
            LinkEnd::new(ContigId::new(left), left_terminus),
            LinkEnd::new(ContigId::new(right), right_terminus),
            depth,
        )
    }

    /// Both endpoint contigs.
    pub fn contigs(&self) -> [ContigId; 2] {
        [self.left.contig, self.right.contig]
    }

    /// Whether either end touches the contig.
    pub fn touches(&self, id: ContigId) -> bool {
        self.left.contig == id || self.right.contig == id
    }

    /// Whether both ends are the same contig.
    pub fn is_self_link(&self) -> bool {
        self.left.contig == self.right.contig
    }

    /// The endpoint opposite to the one on `id`, if the link touches `id`.
    ///
    /// For a self-link this returns the right end.
    pub fn other_end(&self, id: ContigId) -> Option<LinkEnd> {
        if self.left.contig == id {
            Some(self.right)
        } else if self.right.contig == id {
            Some(self.left)
        } else {
            None
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <-> {} ({:.1}x)", self.left, self.right, self.depth)
    }
}
