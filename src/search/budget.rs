//! Per-contig pass budgets.
//!
//! Target contigs may be entered a number of times proportional to their
//! depth relative to the start contig. Interfering contigs carry a used
//! count instead; deep search admits them once, the fan-out once more.

use crate::policy::SearchPolicy;
use super::arena::{BackboneArena, NodeKind};
use super::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Remaining(u32),
    Used(u32),
}

/// Remaining traversals per arena node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassBudget {
    slots: Vec<Slot>,
}

impl PassBudget {
    /// Initial budgets for a search starting at `start`.
    ///
    /// The reference depth is the mean of the start depth and the smallest
    /// depth among long, not-too-shallow target contigs. A non-positive
    /// reference depth is a precondition failure.
    pub fn initial(arena: &BackboneArena, start: usize, policy: &SearchPolicy) -> Result<Self, SearchError> {
        let start_depth = arena.depth(start);
        let min_depth = (0..arena.len())
            .filter(|&i| arena.kind(i) == NodeKind::Target)
            .filter(|&i| arena.length(i) > policy.budget_min_len)
            .map(|i| arena.depth(i))
            .filter(|&d| d > policy.budget_depth_ratio * start_depth)
            .fold(start_depth, f64::min);

        let denom = (start_depth + min_depth) / 2.0;
        if denom <= 0.0 || !denom.is_finite() {
            return Err(SearchError::InvalidBudgetDenominator {
                contig: arena.id(start),
                denominator: denom,
            });
        }

        let slots = (0..arena.len())
            .map(|i| match arena.kind(i) {
                NodeKind::Target => {
                    let passes = (arena.depth(i) / denom + 0.5).floor();
                    Slot::Remaining((passes as u32).max(1))
                }
                NodeKind::Interfering => Slot::Used(0),
                NodeKind::Other => Slot::Remaining(1),
            })
            .collect();
        Ok(Self { slots })
    }

    /// Whether deep search may enter `idx`.
    pub fn admits(&self, idx: usize) -> bool {
        match self.slots[idx] {
            Slot::Remaining(n) => n > 0,
            Slot::Used(n) => n == 0,
        }
    }

    /// Whether the fan-out may enter `idx`, allowing `extra` extra
    /// interfering passes.
    pub fn admits_fanout(&self, idx: usize, extra: u32) -> bool {
        match self.slots[idx] {
            Slot::Remaining(n) => n > 0,
            Slot::Used(n) => n <= extra,
        }
    }

    /// Consume one pass.
    pub fn enter(&mut self, idx: usize) {
        self.slots[idx] = match self.slots[idx] {
            Slot::Remaining(n) => Slot::Remaining(n.saturating_sub(1)),
            Slot::Used(n) => Slot::Used(n + 1),
        };
    }

    /// Restore one pass consumed by [`PassBudget::enter`].
    pub fn leave(&mut self, idx: usize) {
        self.slots[idx] = match self.slots[idx] {
            Slot::Remaining(n) => Slot::Remaining(n + 1),
            Slot::Used(n) => Slot::Used(n.saturating_sub(1)),
        };
    }

    /// Remaining passes of a budgeted node, or `None` for interfering nodes.
    pub fn remaining(&self, idx: usize) -> Option<u32> {
        match self.slots[idx] {
            Slot::Remaining(n) => Some(n),
            Slot::Used(_) => None,
        }
    }
}
