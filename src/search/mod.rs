//! Path search over a backbone.
//!
//! - [`arena`]: index-based adjacency with ordered successors
//! - [`budget`]: per-contig pass budgets
//! - [`frame`]: path prefixes with scoped entry and restore
//! - [`fanout`]: bounded breadth-first split into parallel roots
//! - [`engine`]: the threaded depth-first search and its shared best record

pub mod arena;
pub mod budget;
pub mod engine;
pub mod fanout;
pub mod frame;

pub use arena::{BackboneArena, DegreeExceeded, Neighbour, NodeKind};
pub use budget::PassBudget;
pub use engine::{PathSearchEngine, SearchFailure, SearchOutcome, SearchRequest};
pub use frame::{Descent, SearchFrame};

use crate::types::ContigId;

/// Error type for path search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The budget reference depth is zero or not finite.
    #[error("Invalid budget denominator {denominator} for start contig {contig}")]
    InvalidBudgetDenominator {
        /// Start contig.
        contig: ContigId,
        /// Offending reference depth.
        denominator: f64,
    },
    /// The start or end contig is not on the backbone.
    #[error("Contig {0} is not on the backbone")]
    NotOnBackbone(ContigId),
}
