//! A partial path under construction.
//!
//! The frame carries its own pass budget and running counters so that a
//! candidate can be scored without rescanning the path. Deep search enters
//! successors through [`SearchFrame::descend`], whose guard restores the
//! budget and counters when dropped.

use std::ops::{Deref, DerefMut};

use super::arena::{BackboneArena, NodeKind};
use super::budget::PassBudget;
use crate::types::{PathMetrics, PathStep, PathType, Terminus};

/// Path prefix with its budget snapshot.
#[derive(Debug, Clone)]
pub struct SearchFrame {
    steps: Vec<(usize, Terminus)>,
    length: u64,
    budget: PassBudget,
    visits: Vec<u32>,
    uniq_target_length: u64,
    uniq_target_nodes: u32,
    target_traversals: u32,
    uniq_interfering_nodes: u32,
    interfering_traversals: u32,
}

impl SearchFrame {
    /// A one-step path at the start contig. The start's budget is not
    /// consumed.
    pub fn root(arena: &BackboneArena, start: usize, entry: Terminus, budget: PassBudget) -> Self {
        let mut frame = Self {
            steps: Vec::with_capacity(arena.len() * 2),
            length: 0,
            budget,
            visits: vec![0; arena.len()],
            uniq_target_length: 0,
            uniq_target_nodes: 0,
            target_traversals: 0,
            uniq_interfering_nodes: 0,
            interfering_traversals: 0,
        };
        frame.record(arena, start, entry);
        frame
    }

    fn record(&mut self, arena: &BackboneArena, idx: usize, entry: Terminus) {
        self.steps.push((idx, entry));
        self.length += arena.length(idx);
        self.visits[idx] += 1;
        let first = self.visits[idx] == 1;
        match arena.kind(idx) {
            NodeKind::Target => {
                self.target_traversals += 1;
                if first {
                    self.uniq_target_nodes += 1;
                    self.uniq_target_length += arena.length(idx);
                }
            }
            NodeKind::Interfering => {
                self.interfering_traversals += 1;
                if first {
                    self.uniq_interfering_nodes += 1;
                }
            }
            NodeKind::Other => {}
        }
    }

    /// Append a step and consume one pass of its contig.
    pub(crate) fn push(&mut self, arena: &BackboneArena, idx: usize, entry: Terminus) {
        self.budget.enter(idx);
        self.record(arena, idx, entry);
    }

    /// Remove the last step and restore its pass. The root step is never
    /// removed.
    pub(crate) fn pop(&mut self, arena: &BackboneArena) {
        if self.steps.len() <= 1 {
            return;
        }
        let Some((idx, _)) = self.steps.pop() else {
            return;
        };
        self.length -= arena.length(idx);
        let last = self.visits[idx] == 1;
        self.visits[idx] -= 1;
        match arena.kind(idx) {
            NodeKind::Target => {
                self.target_traversals -= 1;
                if last {
                    self.uniq_target_nodes -= 1;
                    self.uniq_target_length -= arena.length(idx);
                }
            }
            NodeKind::Interfering => {
                self.interfering_traversals -= 1;
                if last {
                    self.uniq_interfering_nodes -= 1;
                }
            }
            NodeKind::Other => {}
        }
        self.budget.leave(idx);
    }

    /// Enter a successor for the lifetime of the returned guard.
    pub fn descend<'f>(&'f mut self, arena: &'f BackboneArena, idx: usize, entry: Terminus) -> Descent<'f> {
        self.push(arena, idx, entry);
        Descent { frame: self, arena }
    }

    /// Current tip: arena index and the terminus it was entered through.
    pub fn tip(&self) -> (usize, Terminus) {
        // A frame always holds its root step.
        self.steps[self.steps.len() - 1]
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: a frame holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Pass budget of this frame.
    pub fn budget(&self) -> &PassBudget {
        &self.budget
    }

    /// Sum of lengths of distinct target contigs visited so far.
    pub fn uniq_target_length(&self) -> u64 {
        self.uniq_target_length
    }

    /// Ranking metrics of the frame as a candidate of `path_type`.
    ///
    /// A circular candidate ends on the repeated start contig, whose
    /// length is not counted twice.
    pub fn metrics(&self, arena: &BackboneArena, path_type: PathType) -> PathMetrics {
        let path_length = match path_type {
            PathType::Circular => self.length.saturating_sub(arena.length(self.tip().0)),
            PathType::Linear => self.length,
        };
        PathMetrics {
            uniq_target_length: self.uniq_target_length,
            uniq_target_nodes: self.uniq_target_nodes,
            path_type,
            target_traversals: self.target_traversals,
            path_length,
            uniq_interfering_nodes: self.uniq_interfering_nodes,
            interfering_traversals: self.interfering_traversals,
        }
    }

    /// Steps as contig ids.
    pub fn path_steps(&self, arena: &BackboneArena) -> Vec<PathStep> {
        self.steps
            .iter()
            .map(|&(idx, terminus)| PathStep::new(arena.id(idx), terminus))
            .collect()
    }
}

/// Scoped entry into a successor; dropping it backtracks.
pub struct Descent<'f> {
    frame: &'f mut SearchFrame,
    arena: &'f BackboneArena,
}

impl Deref for Descent<'_> {
    type Target = SearchFrame;

    fn deref(&self) -> &SearchFrame {
        self.frame
    }
}

impl DerefMut for Descent<'_> {
    fn deref_mut(&mut self) -> &mut SearchFrame {
        self.frame
    }
}

impl Drop for Descent<'_> {
    fn drop(&mut self) {
        self.frame.pop(self.arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use crate::backbone::Backbone;
    use crate::policy::SearchPolicy;
    use crate::types::{Contig, ContigId, ContigTable, Link};

    fn triangle() -> BackboneArena {
        let contigs = ContigTable::from_contigs(vec![
            Contig::new(ContigId::new(1), "a", 1000, 20.0),
            Contig::new(ContigId::new(2), "b", 2000, 20.0),
            Contig::new(ContigId::new(3), "c", 1500, 20.0),
        ])
        .unwrap();
        let backbone = Backbone {
            nodes: vec![ContigId::new(1), ContigId::new(2), ContigId::new(3)],
            links: vec![
                Link::between(1, Terminus::Tail, 2, Terminus::Head, 10.0),
                Link::between(2, Terminus::Tail, 3, Terminus::Head, 10.0),
                Link::between(3, Terminus::Tail, 1, Terminus::Head, 10.0),
            ],
        };
        BackboneArena::build(&backbone, &contigs, &backbone.node_set(), &BTreeSet::new(), 9).unwrap()
    }

    fn root(arena: &BackboneArena) -> SearchFrame {
        let budget = PassBudget::initial(arena, 0, &SearchPolicy::default()).unwrap();
        SearchFrame::root(arena, 0, Terminus::Head, budget)
    }

    #[test]
    fn test_root_does_not_consume_budget() {
        let arena = triangle();
        let frame = root(&arena);
        assert_eq!(frame.budget().remaining(0), Some(1));
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.uniq_target_length(), 1000);
    }

    #[test]
    fn test_descent_restores_on_drop() {
        let arena = triangle();
        let mut frame = root(&arena);
        let budget_before = frame.budget().clone();
        {
            let mut child = frame.descend(&arena, 1, Terminus::Head);
            assert_eq!(child.budget().remaining(1), Some(0));
            let grandchild = child.descend(&arena, 2, Terminus::Head);
            assert_eq!(grandchild.len(), 3);
            assert_eq!(grandchild.uniq_target_length(), 4500);
        }
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.budget(), &budget_before);
        assert_eq!(frame.uniq_target_length(), 1000);
    }

    #[test]
    fn test_circular_metrics_drop_closing_repeat() {
        let arena = triangle();
        let mut frame = root(&arena);
        frame.push(&arena, 1, Terminus::Head);
        frame.push(&arena, 2, Terminus::Head);
        frame.push(&arena, 0, Terminus::Head);

        let circular = frame.metrics(&arena, PathType::Circular);
        assert_eq!(circular.path_length, 4500);
        assert_eq!(circular.uniq_target_nodes, 3);
        assert_eq!(circular.target_traversals, 4);
        assert_eq!(frame.metrics(&arena, PathType::Linear).path_length, 5500);

        let steps = frame.path_steps(&arena);
        assert_eq!(steps.first().map(|s| s.contig), Some(ContigId::new(1)));
        assert_eq!(steps.last().map(|s| s.contig), Some(ContigId::new(1)));
    }

    #[test]
    fn test_pop_keeps_root() {
        let arena = triangle();
        let mut frame = root(&arena);
        frame.pop(&arena);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.tip(), (0, Terminus::Head));
    }
}
