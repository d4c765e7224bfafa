//! Pair sequencer - the match order of one pool
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: schedule() - orchestration
//! - Level 2: use_reference_order(), run_greedy() - build paths
//! - Level 3: create_pairs() - greedy loop
//! - Level 4: queries and the diagnostic dump

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::affinity::AffinityIndex;
use crate::opponent::{OpponentGraph, SlotId, UNSCORED};
use crate::ordering::{pair_count, reference_order, OrderingStyle};
use crate::pair::Pair;

/// How the current pair list was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPath {
    /// Copied from the reference order
    StaticTable,
    /// Grown by the greedy loop
    Greedy,
}

/// Lifecycle of a sequencer run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequencerState {
    #[default]
    Empty,
    Built(BuildPath),
    Scored(BuildPath),
}

/// Result of a scheduling run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleOutcome {
    /// Every bout of the pool is placed
    Complete,
    /// The greedy loop ran out of candidates; the placed bouts are kept
    Stalled { placed: usize, expected: usize },
}

impl ScheduleOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, ScheduleOutcome::Complete)
    }
}

/// Sequencer configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerConfig {
    /// Reference order family for ungrouped pools
    pub style: OrderingStyle,
}

impl SequencerConfig {
    pub fn with_style(mut self, style: OrderingStyle) -> Self {
        self.style = style;
        self
    }
}

/// Builds and serves the match order of one pool
#[derive(Clone, Debug, Default)]
pub struct PairSequencer {
    config: SequencerConfig,
    state: SequencerState,
    pool_size: usize,
    graph: OpponentGraph,
    pairs: Vec<Pair>,
}

impl PairSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    // ========================================================================
    // Level 1 - Orchestration
    // ========================================================================

    /// Schedule a pool of `competitors`
    ///
    /// The pool size is the length of the list; slot N is the competitor at
    /// position N-1. `affinity_key` returns the grouping value of a
    /// competitor, `None` when it has none. Pass `|_| None` to schedule
    /// without any grouping.
    pub fn schedule<T, F>(&mut self, competitors: &[T], affinity_key: F) -> ScheduleOutcome
    where
        F: FnMut(&T) -> Option<String>,
    {
        let index = AffinityIndex::build(competitors, affinity_key);
        self.schedule_with_index(&index)
    }

    /// Schedule an anonymous pool without grouping
    pub fn schedule_ungrouped(&mut self, pool_size: usize) -> ScheduleOutcome {
        self.schedule_with_index(&AffinityIndex::ungrouped(pool_size))
    }

    /// Schedule from a prebuilt affinity index
    pub fn schedule_with_index(&mut self, index: &AffinityIndex) -> ScheduleOutcome {
        self.reset(index.competitor_count());
        self.graph = OpponentGraph::from_affinity(index);

        let expected = pair_count(self.pool_size);
        let table = reference_order(self.pool_size, self.config.style);

        let path = match table {
            Some(table) if index.is_degenerate() => {
                tracing::debug!(
                    "pool of {}: {} groups, using reference order",
                    self.pool_size,
                    index.group_count()
                );
                self.use_reference_order(table)
            }
            _ => {
                tracing::debug!(
                    "pool of {}: {} groups, running greedy order",
                    self.pool_size,
                    index.group_count()
                );
                self.run_greedy(index)
            }
        };
        self.state = SequencerState::Built(path);

        self.graph.reset_fitness(expected);
        self.graph.refresh_fitness(&mut self.pairs);
        self.state = SequencerState::Scored(path);

        tracing::trace!("{}", self.dump());

        if self.pairs.len() == expected {
            ScheduleOutcome::Complete
        } else {
            tracing::warn!(
                "pool of {}: only {} of {} bouts could be ordered",
                self.pool_size,
                self.pairs.len(),
                expected
            );
            ScheduleOutcome::Stalled {
                placed: self.pairs.len(),
                expected,
            }
        }
    }

    fn reset(&mut self, pool_size: usize) {
        self.state = SequencerState::Empty;
        self.pool_size = pool_size;
        self.graph = OpponentGraph::default();
        self.pairs.clear();
    }

    // ========================================================================
    // Level 2 - Build paths
    // ========================================================================

    fn use_reference_order(&mut self, table: &[(u8, u8)]) -> BuildPath {
        self.pairs = table
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| Pair::new(i as u32 + 1, SlotId(a.into()), SlotId(b.into())))
            .collect();
        BuildPath::StaticTable
    }

    fn run_greedy(&mut self, index: &AffinityIndex) -> BuildPath {
        for bucket in index.buckets() {
            self.graph.lock(bucket.group_id, bucket.len());
        }
        self.graph.build_preference_order();

        self.pairs = create_pairs(&mut self.graph, pair_count(self.pool_size));
        BuildPath::Greedy
    }

    // ========================================================================
    // Level 4 - Queries
    // ========================================================================

    /// Bout at `match_index` (0-based): both slots and the rest flag
    pub fn get_pair(&self, match_index: usize) -> Option<(SlotId, SlotId, bool)> {
        self.pairs.get(match_index).map(|p| (p.a, p.b, p.rest_error))
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn graph(&self) -> &OpponentGraph {
        &self.graph
    }

    /// Number of bouts flagged with too little rest
    pub fn rest_error_count(&self) -> usize {
        self.pairs.iter().filter(|p| p.rest_error).count()
    }

    /// Diagnostic listing of the order and the rest distribution
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let max_rest = self
            .pairs
            .iter()
            .map(|p| p.fitness_a.max(p.fitness_b))
            .max()
            .unwrap_or(0)
            .max(0) as usize;

        let _ = writeln!(out, "**** pool of {} ({:?})", self.pool_size, self.state);

        for pair in &self.pairs {
            let _ = writeln!(
                out,
                "{:3}: {:2}({}) - {:2}({}){}",
                pair.order,
                pair.a,
                rest_label(pair.fitness_a),
                pair.b,
                rest_label(pair.fitness_b),
                if pair.rest_error { "  !" } else { "" }
            );
        }

        let _ = write!(out, "   ");
        for rest in 0..=max_rest {
            let _ = write!(out, "; rest {:2}", rest);
        }
        let _ = writeln!(out);

        let mut digest = vec![0u32; max_rest + 1];
        for competitor in self.graph.competitors() {
            let histogram = competitor.rest_histogram(max_rest);
            let _ = write!(out, " {:2}", competitor.slot_id);
            for (rest, count) in histogram.iter().enumerate() {
                let _ = write!(out, ";      {:2}", count);
                digest[rest] += count;
            }
            let _ = writeln!(out);
        }

        for (rest, count) in digest.iter().enumerate() {
            let _ = write!(out, "{}:{:2}   ", rest, count);
        }
        let _ = writeln!(out);

        out
    }
}

// ============================================================================
// Level 3 - Greedy loop
// ============================================================================

/// Grow the order one bout at a time
///
/// The fencer who has waited longest picks its best remaining opponent. The
/// bout is taken when that opponent sat out at least the previous bout;
/// otherwise the next fencer in line gets to pick. Stops when every bout is
/// placed or nobody can pick.
///
/// Under this acceptance rule nobody-can-pick is unreachable: a fencer is only
/// turned down because its best opponent fenced the previous bout, and each
/// of those two fencers still has an unmet opponent who sat that bout out.
/// The early stop, and `ScheduleOutcome::Stalled`, only guard the loop bound.
fn create_pairs(graph: &mut OpponentGraph, total: usize) -> Vec<Pair> {
    let mut pairs = Vec::with_capacity(total);
    let mut working = graph.slots_by_rest();
    let mut cursor = 0;
    let mut iteration: i32 = 1;

    while pairs.len() < total && cursor < working.len() {
        let a = working[cursor];
        let accepted = graph.best_unscheduled_opponent(a).filter(|&b| {
            let rest = graph
                .competitor(b)
                .map_or(UNSCORED, |c| c.current_fitness());
            rest == UNSCORED || rest < iteration - 1
        });

        match accepted {
            Some(b) => {
                graph.record_pair(a, b, iteration);
                pairs.push(Pair::new(iteration as u32, a, b));

                working = graph.slots_by_rest();
                cursor = 0;
                iteration += 1;
            }
            None => cursor += 1,
        }
    }

    pairs
}

fn rest_label(fitness: i32) -> String {
    if fitness == UNSCORED {
        " ".to_string()
    } else {
        fitness.to_string()
    }
}
