//! Multithreaded capacitated path search.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::arena::BackboneArena;
use super::budget::PassBudget;
use super::fanout::fan_out;
use super::frame::SearchFrame;
use super::SearchError;
use crate::backbone::Backbone;
use crate::policy::{evaluate_candidate, SearchPolicy};
use crate::types::{ContigId, ContigTable, PathScore, PathStep, PathType, Terminus};

/// Inputs of one search run.
#[derive(Debug, Clone, Copy)]
pub struct SearchRequest<'a> {
    /// Root step: the start contig and the terminus it is entered through.
    pub start: PathStep,
    /// Closing step: a circular path re-enters this contig through any
    /// terminus other than this one.
    pub end: PathStep,
    /// Backbone to walk.
    pub backbone: &'a Backbone,
    /// Contig table.
    pub contigs: &'a ContigTable,
    /// Target-organelle contigs.
    pub targets: &'a BTreeSet<ContigId>,
    /// Other-organelle contigs.
    pub interfering: &'a BTreeSet<ContigId>,
}

/// Why a search produced no usable path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchFailure {
    /// A backbone contig has too many neighbours on one side.
    DegreeExceeded {
        /// Offending contig.
        contig: ContigId,
        /// Neighbours on the offending side.
        degree: usize,
    },
    /// No candidate beyond the start contig was found.
    NoPath,
}

/// Result of a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Best record.
    pub score: PathScore,
    /// Unique target length covered by the best path over total target length.
    pub coverage_ratio: f64,
    /// Whether the best path extends beyond its start contig.
    pub ok: bool,
    /// Failure reason when `ok` is false.
    pub failure: Option<SearchFailure>,
    /// Number of parallel roots searched.
    pub roots: usize,
    /// Whether the stall cutoff ended the search early.
    pub stopped: bool,
}

impl SearchOutcome {
    fn failed(failure: SearchFailure, interfering: usize) -> Self {
        Self {
            score: PathScore::initial(interfering),
            coverage_ratio: 0.0,
            ok: false,
            failure: Some(failure),
            roots: 0,
            stopped: false,
        }
    }
}

/// Best-so-far record shared by all workers.
struct SharedBest {
    best: Mutex<PathScore>,
    stop: AtomicBool,
    stall_limit: u64,
    gate_interfering: bool,
}

impl SharedBest {
    fn new(initial: PathScore, stall_limit: u64, gate_interfering: bool) -> Self {
        Self {
            best: Mutex::new(initial),
            stop: AtomicBool::new(false),
            stall_limit,
            gate_interfering,
        }
    }

    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Evaluate a candidate; copies it in on improvement.
    fn offer(&self, arena: &BackboneArena, frame: &SearchFrame, path_type: PathType) {
        let metrics = frame.metrics(arena, path_type);
        let stalled = {
            let mut best = self.best.lock();
            best.stall_count += 1;
            if evaluate_candidate(&metrics, &best.metrics, self.gate_interfering) {
                best.metrics = metrics;
                best.steps = frame.path_steps(arena);
                best.stall_count = 0;
            }
            best.stall_count > self.stall_limit
        };
        if stalled {
            self.stop.store(true, Ordering::Relaxed);
        }
    }

    fn into_inner(self) -> PathScore {
        self.best.into_inner()
    }
}

/// Depth-first worker over one root.
struct Walker<'a> {
    arena: &'a BackboneArena,
    shared: &'a SharedBest,
    end: (usize, Terminus),
    target_length: u64,
    coverage_eval_ratio: f64,
}

impl Walker<'_> {
    fn coverage(&self, frame: &SearchFrame) -> f64 {
        if self.target_length == 0 {
            return 0.0;
        }
        frame.uniq_target_length() as f64 / self.target_length as f64
    }

    fn search(&self, frame: &mut SearchFrame) {
        if self.shared.stopped() {
            return;
        }
        let (tip, entered) = frame.tip();
        if frame.len() > 1 && tip == self.end.0 && entered != self.end.1 {
            self.shared.offer(self.arena, frame, PathType::Circular);
            return;
        }
        if self.coverage(frame) > self.coverage_eval_ratio {
            self.shared.offer(self.arena, frame, PathType::Linear);
        }

        let mut extended = false;
        for next in self.arena.neighbours(tip, entered.opposite()) {
            if !frame.budget().admits(next.idx) {
                continue;
            }
            extended = true;
            let mut child = frame.descend(self.arena, next.idx, next.entry);
            self.search(&mut child);
        }
        if !extended {
            self.shared.offer(self.arena, frame, PathType::Linear);
        }
    }
}

/// Capacity-constrained path search over a backbone.
///
/// ## Algorithm
///
/// 1. Build the arena adjacency and the start contig's pass budgets
/// 2. Fan the start path out into at most `2 × parallelism` roots
/// 3. Search every root depth-first on its own thread, entering a
///    successor only while its budget admits it
/// 4. Score candidates (closures, high-coverage prefixes, dead ends)
///    against one shared best record
/// 5. Stop all workers once the record has not improved for
///    `stall_limit` evaluations
#[derive(Debug, Clone)]
pub struct PathSearchEngine {
    policy: SearchPolicy,
    gate_interfering: bool,
}

impl PathSearchEngine {
    /// Create an engine. `gate_interfering` enables the unique-interfering
    /// ranking criterion.
    pub fn new(policy: SearchPolicy, gate_interfering: bool) -> Self {
        Self {
            policy,
            gate_interfering,
        }
    }

    /// Search policy in use.
    pub fn policy(&self) -> &SearchPolicy {
        &self.policy
    }

    /// Find the best path from `request.start`.
    ///
    /// Structural problems of the backbone are reported in the outcome;
    /// only an unusable budget reference depth or a start contig off the
    /// backbone is an error.
    pub fn find_best_path(&self, request: &SearchRequest<'_>) -> Result<SearchOutcome, SearchError> {
        let interfering = request.interfering.len();
        let arena = match BackboneArena::build(
            request.backbone,
            request.contigs,
            request.targets,
            request.interfering,
            self.policy.max_side_degree,
        ) {
            Ok(arena) => arena,
            Err(e) => {
                debug!(contig = %e.contig, degree = e.degree, "Backbone side degree exceeded");
                return Ok(SearchOutcome::failed(
                    SearchFailure::DegreeExceeded {
                        contig: e.contig,
                        degree: e.degree,
                    },
                    interfering,
                ));
            }
        };

        let start = arena
            .index_of(request.start.contig)
            .ok_or(SearchError::NotOnBackbone(request.start.contig))?;
        let end = arena
            .index_of(request.end.contig)
            .ok_or(SearchError::NotOnBackbone(request.end.contig))?;

        let budget = PassBudget::initial(&arena, start, &self.policy)?;
        let root = SearchFrame::root(&arena, start, request.start.terminus, budget);
        let end = (end, request.end.terminus);
        let roots = fan_out(&arena, root, end, &self.policy);
        let root_count = roots.len();

        let shared = SharedBest::new(
            PathScore::initial(interfering),
            self.policy.stall_limit,
            self.gate_interfering,
        );
        let target_length = arena.target_length();
        let walker = Walker {
            arena: &arena,
            shared: &shared,
            end,
            target_length,
            coverage_eval_ratio: self.policy.coverage_eval_ratio,
        };

        std::thread::scope(|scope| {
            for mut frame in roots {
                let walker = &walker;
                scope.spawn(move || walker.search(&mut frame));
            }
        });

        let stopped = shared.stopped();
        let score = shared.into_inner();
        let coverage_ratio = if target_length == 0 {
            0.0
        } else {
            score.metrics.uniq_target_length as f64 / target_length as f64
        };
        let ok = score.steps.len() > 1;

        info!(
            start = %request.start.contig,
            roots = root_count,
            path_type = %score.metrics.path_type,
            length = score.metrics.path_length,
            coverage = coverage_ratio,
            stopped = stopped,
            ok = ok,
            "Path search finished"
        );

        Ok(SearchOutcome {
            score,
            coverage_ratio,
            ok,
            failure: (!ok).then_some(SearchFailure::NoPath),
            roots: root_count,
            stopped,
        })
    }
}
