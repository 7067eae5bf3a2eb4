//! Path types: the output of the path search.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::contig::{ContigId, Terminus};

/// Shape of a resolved path.
///
/// Ordinal order matters for ranking: `Circular < Linear`, and a lower
/// ordinal is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PathType {
    /// The path closes back on its start contig.
    Circular,
    /// The path ends at a dead end.
    Linear,
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Circular => write!(f, "circular"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

/// One step of a path: a contig and the terminus it was entered through.
///
/// The walk leaves the contig through `terminus.opposite()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PathStep {
    /// Contig visited.
    pub contig: ContigId,
    /// Terminus the contig was entered through.
    pub terminus: Terminus,
}

impl PathStep {
    /// Create a new step.
    pub fn new(contig: ContigId, terminus: Terminus) -> Self {
        Self { contig, terminus }
    }

    /// Terminus the walk exits through.
    pub fn exit(&self) -> Terminus {
        self.terminus.opposite()
    }
}

/// Ranking metrics of a candidate path.
///
/// Field order follows the tie-break order used by
/// [`crate::policy::ranking::compare_candidates`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathMetrics {
    /// Sum of lengths of distinct target contigs on the path.
    pub uniq_target_length: u64,
    /// Number of distinct target contigs on the path.
    pub uniq_target_nodes: u32,
    /// Circular or linear.
    pub path_type: PathType,
    /// Target contig visits, repeats included.
    pub target_traversals: u32,
    /// Total path length in bp, repeats included.
    pub path_length: u64,
    /// Number of distinct interfering contigs on the path.
    pub uniq_interfering_nodes: u32,
    /// Interfering contig visits, repeats included.
    pub interfering_traversals: u32,
}

impl PathMetrics {
    /// The worst possible record for a search with `interfering` interfering contigs.
    pub fn floor(interfering: usize) -> Self {
        let interfering = interfering as u32;
        Self {
            uniq_target_length: 0,
            uniq_target_nodes: 0,
            path_type: PathType::Linear,
            target_traversals: 0,
            path_length: 0,
            uniq_interfering_nodes: interfering,
            interfering_traversals: interfering.saturating_mul(10),
        }
    }
}

/// A resolved path through the backbone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Ordered steps. A circular path repeats its start contig as the last step.
    pub steps: Vec<PathStep>,
    /// Total length in bp, excluding the closing repeat of a circular path.
    pub length: u64,
    /// Circular or linear.
    pub path_type: PathType,
}

impl Path {
    /// Contigs in walk order without the closing repeat of a circular path.
    pub fn assembled_contigs(&self) -> Vec<ContigId> {
        let take = match self.path_type {
            PathType::Circular => self.steps.len().saturating_sub(1),
            PathType::Linear => self.steps.len(),
        };
        self.steps.iter().take(take).map(|s| s.contig).collect()
    }

    /// Number of steps, closing repeat included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the path has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// The shared best-so-far record of a path search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathScore {
    /// Ranking metrics of the best candidate.
    pub metrics: PathMetrics,
    /// Steps of the best candidate.
    pub steps: Vec<PathStep>,
    /// Evaluations since the last improvement.
    pub stall_count: u64,
}

impl PathScore {
    /// Initial record before any candidate has been evaluated.
    pub fn initial(interfering: usize) -> Self {
        Self {
            metrics: PathMetrics::floor(interfering),
            steps: Vec::new(),
            stall_count: 0,
        }
    }

    /// Convert the record into a [`Path`].
    pub fn to_path(&self) -> Path {
        Path {
            steps: self.steps.clone(),
            length: self.metrics.path_length,
            path_type: self.metrics.path_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: u32, terminus: Terminus) -> PathStep {
        PathStep::new(ContigId::new(id), terminus)
    }

    #[test]
    fn test_assembled_contigs_drop_circular_repeat() {
        let path = Path {
            steps: vec![
                step(2, Terminus::Head),
                step(3, Terminus::Head),
                step(1, Terminus::Head),
                step(2, Terminus::Head),
            ],
            length: 4500,
            path_type: PathType::Circular,
        };
        let ids: Vec<u32> = path.assembled_contigs().iter().map(|c| c.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let linear = Path { path_type: PathType::Linear, ..path };
        assert_eq!(linear.assembled_contigs().len(), 4);
    }

    #[test]
    fn test_type_ordinal() {
        assert!(PathType::Circular < PathType::Linear);
        assert_eq!(step(1, Terminus::Head).exit(), Terminus::Tail);
    }

    #[test]
    fn test_floor_metrics() {
        let floor = PathMetrics::floor(3);
        assert_eq!(floor.uniq_interfering_nodes, 3);
        assert_eq!(floor.interfering_traversals, 30);
        assert_eq!(floor.path_type, PathType::Linear);
    }
}
