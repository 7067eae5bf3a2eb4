//! Tie-break ranking of candidate paths.

use std::cmp::Ordering;

use crate::types::PathMetrics;

/// Compare two candidates. `Greater` means `a` is preferred over `b`.
///
/// Criteria, first difference wins:
/// ```text
/// 1. larger unique target length
/// 2. more unique target contigs
/// 3. lower type ordinal (Circular before Linear)
/// 4. more target traversals
/// 5. shorter path length
/// 6. fewer unique interfering contigs (only when `gate_interfering`)
/// 7. fewer interfering traversals
/// ```
pub fn compare_candidates(a: &PathMetrics, b: &PathMetrics, gate_interfering: bool) -> Ordering {
    a.uniq_target_length
        .cmp(&b.uniq_target_length)
        .then(a.uniq_target_nodes.cmp(&b.uniq_target_nodes))
        .then(a.path_type.cmp(&b.path_type).reverse())
        .then(a.target_traversals.cmp(&b.target_traversals))
        .then(a.path_length.cmp(&b.path_length).reverse())
        .then(if gate_interfering {
            a.uniq_interfering_nodes.cmp(&b.uniq_interfering_nodes).reverse()
        } else {
            Ordering::Equal
        })
        .then(a.interfering_traversals.cmp(&b.interfering_traversals).reverse())
}

/// Whether `candidate` strictly improves on `best`.
pub fn evaluate_candidate(candidate: &PathMetrics, best: &PathMetrics, gate_interfering: bool) -> bool {
    compare_candidates(candidate, best, gate_interfering) == Ordering::Greater
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PathType;

    fn metrics(len: u64, nodes: u32, path_type: PathType) -> PathMetrics {
        PathMetrics {
            uniq_target_length: len,
            uniq_target_nodes: nodes,
            path_type,
            target_traversals: nodes,
            path_length: len,
            uniq_interfering_nodes: 0,
            interfering_traversals: 0,
        }
    }

    #[test]
    fn test_length_dominates_type() {
        let long_linear = metrics(5000, 3, PathType::Linear);
        let short_circular = metrics(4000, 3, PathType::Circular);
        assert!(evaluate_candidate(&long_linear, &short_circular, true));
    }

    #[test]
    fn test_circular_beats_linear_on_tie() {
        let circular = metrics(4500, 3, PathType::Circular);
        let linear = metrics(4500, 3, PathType::Linear);
        assert!(evaluate_candidate(&circular, &linear, true));
        assert!(!evaluate_candidate(&linear, &circular, true));
    }

    #[test]
    fn test_shorter_path_preferred() {
        let a = metrics(4500, 3, PathType::Circular);
        let mut b = a;
        b.path_length = 6000;
        assert_eq!(compare_candidates(&a, &b, true), Ordering::Greater);
    }

    #[test]
    fn test_interfering_gate() {
        let mut a = metrics(4500, 3, PathType::Circular);
        let mut b = a;
        a.uniq_interfering_nodes = 1;
        a.interfering_traversals = 1;
        b.uniq_interfering_nodes = 2;
        b.interfering_traversals = 1;

        assert!(evaluate_candidate(&a, &b, true));
        // With the gate off, criterion 6 is skipped and 7 ties.
        assert_eq!(compare_candidates(&a, &b, false), Ordering::Equal);

        b.interfering_traversals = 4;
        assert!(evaluate_candidate(&a, &b, false));
    }

    #[test]
    fn test_equal_candidates_do_not_improve() {
        let a = metrics(100, 1, PathType::Linear);
        assert!(!evaluate_candidate(&a, &a, true));
    }
}
