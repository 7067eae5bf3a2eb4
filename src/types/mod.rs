//! Core types for the path kernel.

pub mod contig;
pub mod link;
pub mod path;
pub mod hit;

pub use contig::{Contig, ContigId, ContigTable, Terminus};
pub use link::{Link, LinkEnd};
pub use path::{Path, PathMetrics, PathScore, PathStep, PathType};
pub use hit::{HitParseError, SimilarityHit};
