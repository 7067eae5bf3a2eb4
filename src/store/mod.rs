//! Contig graph storage.

pub mod memory;
pub mod reader;

use crate::types::{ContigTable, Link};

/// Read-only access to an assembled contig graph.
///
/// Implementations must return links in a stable order; every stage
/// downstream depends on it for determinism.
pub trait GraphStore: Send + Sync {
    /// The contig table.
    fn contigs(&self) -> &ContigTable;

    /// The raw link list, in input order.
    fn links(&self) -> &[Link];
}

pub use memory::{InMemoryError, InMemoryGraphStore};
pub use reader::{read_graph, GraphReadError};
