//! Bounded breadth-first fan-out of search roots.
//!
//! Prefixes grow in place while their tip has a single successor and fork
//! when it has several, until enough prefixes exist to occupy the worker
//! threads or none can grow further.

use tracing::debug;

use super::arena::BackboneArena;
use super::frame::SearchFrame;
use crate::policy::SearchPolicy;
use crate::types::Terminus;

struct Prefix {
    frame: SearchFrame,
    open: bool,
}

/// Expand `root` into independent search roots.
///
/// `end` is the arena index and terminus that would close a circular path.
/// The result is never empty.
pub fn fan_out(
    arena: &BackboneArena,
    root: SearchFrame,
    end: (usize, Terminus),
    policy: &SearchPolicy,
) -> Vec<SearchFrame> {
    let target = policy.parallelism.max(1);
    let cap = target * 2;
    let extra = policy.interfering_fanout_passes;
    let mut prefixes = vec![Prefix { frame: root, open: true }];
    let mut rounds = 0u32;

    loop {
        rounds += 1;
        let mut any_open = false;
        let live = prefixes.len();
        for i in 0..live {
            if !prefixes[i].open {
                continue;
            }
            any_open = true;
            let (tip, entered) = prefixes[i].frame.tip();
            let successors = arena.neighbours(tip, entered.opposite());

            match successors {
                [] => prefixes[i].open = false,
                [only] => {
                    let prefix = &mut prefixes[i];
                    if (only.idx, only.entry) == end || !prefix.frame.budget().admits_fanout(only.idx, extra) {
                        prefix.open = false;
                        continue;
                    }
                    prefix.frame.push(arena, only.idx, only.entry);
                    if only.idx == end.0 {
                        prefix.open = false;
                    }
                }
                many => {
                    let admissible: Vec<_> = many
                        .iter()
                        .filter(|n| (n.idx, n.entry) != end)
                        .filter(|n| prefixes[i].frame.budget().admits_fanout(n.idx, extra))
                        .copied()
                        .collect();
                    if admissible.is_empty() || prefixes.len() + admissible.len() - 1 > cap {
                        prefixes[i].open = false;
                        continue;
                    }
                    let base = prefixes[i].frame.clone();
                    for (k, next) in admissible.iter().enumerate() {
                        let mut frame = base.clone();
                        frame.push(arena, next.idx, next.entry);
                        let forked = Prefix {
                            frame,
                            open: next.idx != end.0,
                        };
                        if k == 0 {
                            prefixes[i] = forked;
                        } else {
                            prefixes.push(forked);
                        }
                    }
                }
            }
        }
        if prefixes.len() >= target || !any_open {
            break;
        }
    }

    debug!(roots = prefixes.len(), rounds = rounds, "Search roots prepared");
    prefixes.into_iter().map(|p| p.frame).collect()
}
