//! Opponent graph - per-pool working state of the greedy scheduler
//!
//! One [`Competitor`] node per pool slot. Each node knows its affinity lock,
//! ranks the other slots by how desirable a bout against them is, and keeps
//! a rest profile filled in once the schedule is final.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::affinity::{AffinityIndex, GroupId};
use crate::pair::Pair;

/// Fitness value of a competitor that has not been scored yet
pub const UNSCORED: i32 = -1;

/// 1-based position of a competitor within its pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(pub u32);

impl SlotId {
    /// Slot for a 0-based list index
    pub const fn from_index(index: usize) -> Self {
        SlotId(index as u32 + 1)
    }

    /// 0-based list index of the slot
    pub const fn index(self) -> usize {
        (self.0 as usize).saturating_sub(1)
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One pool participant, as seen by the scheduler
#[derive(Clone, Debug)]
pub struct Competitor {
    pub slot_id: SlotId,
    pub affinity_group: Option<GroupId>,
    /// Size of the affinity bucket when it holds more than one member
    pub lock_count: u32,
    /// Rest before each pair slot, `UNSCORED` where the competitor is idle
    pub fitness: Vec<i32>,
    /// Opponents ranked by scheduling desirability
    pub preference_order: Vec<SlotId>,
    /// Preference entries from this position on are locked fencers
    locked_from: usize,
    /// Preference entries from this position on are teammates
    teammates_from: usize,
    /// Order number of the most recent pair, `UNSCORED` before the first one
    last_pair: i32,
    /// Indexed by slot index
    met: Vec<bool>,
}

impl Competitor {
    fn new(slot_id: SlotId, pool_size: usize) -> Self {
        Self {
            slot_id,
            affinity_group: None,
            lock_count: 0,
            fitness: Vec::new(),
            preference_order: Vec::new(),
            locked_from: 0,
            teammates_from: 0,
            last_pair: UNSCORED,
            met: vec![false; pool_size],
        }
    }

    pub fn is_locked(&self) -> bool {
        self.lock_count > 1
    }

    /// True when `other` shares this competitor's non-trivial bucket
    pub fn is_teammate(&self, other: &Competitor) -> bool {
        self.is_locked()
            && self.affinity_group.is_some()
            && self.affinity_group == other.affinity_group
    }

    /// Order number of the latest pair, `UNSCORED` if none yet
    pub fn current_fitness(&self) -> i32 {
        self.last_pair
    }

    /// Preference tier of the entry at `position`: 0 unlocked, 1 locked, 2 teammate
    fn tier_of(&self, position: usize) -> u8 {
        if position >= self.teammates_from {
            2
        } else if position >= self.locked_from {
            1
        } else {
            0
        }
    }

    /// Already paired with `other` in the current run
    pub fn has_met(&self, other: SlotId) -> bool {
        self.met.get(other.index()).copied().unwrap_or(false)
    }

    /// Count of pairs per rest value, up to `max_rest` inclusive
    pub fn rest_histogram(&self, max_rest: usize) -> Vec<u32> {
        let mut histogram = vec![0; max_rest + 1];
        for &rest in &self.fitness {
            if rest >= 0 && (rest as usize) <= max_rest {
                histogram[rest as usize] += 1;
            }
        }
        histogram
    }
}

/// Working state of one pool
#[derive(Clone, Debug, Default)]
pub struct OpponentGraph {
    competitors: Vec<Competitor>,
}

impl OpponentGraph {
    /// Graph with one unlocked node per slot
    pub fn new(pool_size: usize) -> Self {
        Self {
            competitors: (0..pool_size)
                .map(|i| Competitor::new(SlotId::from_index(i), pool_size))
                .collect(),
        }
    }

    /// Graph whose nodes carry the groups of an affinity index
    pub fn from_affinity(index: &AffinityIndex) -> Self {
        let mut graph = Self::new(index.competitor_count());
        for competitor in &mut graph.competitors {
            competitor.affinity_group = index.group_of(competitor.slot_id);
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }

    pub fn competitor(&self, slot: SlotId) -> Option<&Competitor> {
        self.competitors.get(slot.index())
    }

    pub fn competitors(&self) -> &[Competitor] {
        &self.competitors
    }

    /// Lock every member of a group holding more than one competitor
    pub fn lock(&mut self, group_id: GroupId, bucket_size: usize) {
        if bucket_size <= 1 {
            return;
        }

        for competitor in &mut self.competitors {
            if competitor.affinity_group == Some(group_id) {
                competitor.lock_count = bucket_size as u32;
            }
        }
    }

    /// Rank the opponents of every competitor
    ///
    /// Unlocked opponents come first, then locked opponents from other
    /// buckets, then teammates. Each tier keeps slot order.
    pub fn build_preference_order(&mut self) {
        let rankings: Vec<(Vec<SlotId>, usize, usize)> = self
            .competitors
            .iter()
            .map(|competitor| {
                let (locked, unlocked): (Vec<&Competitor>, Vec<&Competitor>) = self
                    .competitors
                    .iter()
                    .filter(|other| other.slot_id != competitor.slot_id)
                    .partition(|other| other.is_locked());
                let (teammates, rivals): (Vec<&Competitor>, Vec<&Competitor>) = locked
                    .into_iter()
                    .partition(|other| competitor.is_teammate(other));

                let locked_from = unlocked.len();
                let teammates_from = locked_from + rivals.len();
                let order = unlocked
                    .into_iter()
                    .chain(rivals)
                    .chain(teammates)
                    .map(|other| other.slot_id)
                    .collect();
                (order, locked_from, teammates_from)
            })
            .collect();

        for (competitor, (order, locked_from, teammates_from)) in
            self.competitors.iter_mut().zip(rankings)
        {
            competitor.preference_order = order;
            competitor.locked_from = locked_from;
            competitor.teammates_from = teammates_from;
        }
    }

    /// Give every competitor a blank rest profile of `total_pairs` slots
    pub fn reset_fitness(&mut self, total_pairs: usize) {
        for competitor in &mut self.competitors {
            competitor.fitness = vec![UNSCORED; total_pairs];
        }
    }

    /// Best opponent `slot` has not met yet
    ///
    /// Unlocked opponents come first, teammates last. Within each tier the
    /// opponent resting the longest is picked, ties keep the preference order.
    pub fn best_unscheduled_opponent(&self, slot: SlotId) -> Option<SlotId> {
        let competitor = self.competitor(slot)?;

        competitor
            .preference_order
            .iter()
            .enumerate()
            .filter(|(_, other)| !competitor.has_met(**other))
            .min_by_key(|(position, other)| {
                let rest = self
                    .competitor(**other)
                    .map_or(UNSCORED, Competitor::current_fitness);
                (competitor.tier_of(*position), rest, *position)
            })
            .map(|(_, other)| *other)
    }

    /// Record that `a` and `b` fence in pair number `order`
    pub fn record_pair(&mut self, a: SlotId, b: SlotId, order: i32) {
        for (this, that) in [(a, b), (b, a)] {
            if let Some(competitor) = self.competitors.get_mut(this.index()) {
                if let Some(met) = competitor.met.get_mut(that.index()) {
                    *met = true;
                }
                competitor.last_pair = order;
            }
        }
    }

    /// Slots sorted by ascending current fitness, ties by slot id
    pub fn slots_by_rest(&self) -> Vec<SlotId> {
        let mut slots: Vec<&Competitor> = self.competitors.iter().collect();
        slots.sort_by_key(|c| (c.current_fitness(), c.slot_id));
        slots.into_iter().map(|c| c.slot_id).collect()
    }

    /// Score every pair of a finished schedule
    ///
    /// Walks the list backwards; each side's rest is the number of pairs
    /// fenced since its previous appearance, 0 meaning back to back.
    pub fn refresh_fitness(&mut self, pairs: &mut [Pair]) {
        let total = pairs.len();
        for competitor in &mut self.competitors {
            if competitor.fitness.len() < total {
                competitor.fitness.resize(total, UNSCORED);
            }
            competitor.fitness.iter_mut().for_each(|f| *f = UNSCORED);
        }

        for current in (0..total).rev() {
            let (earlier, rest) = pairs.split_at_mut(current);
            let pair = &mut rest[0];

            pair.fitness_a = rest_before(earlier, pair.a);
            pair.fitness_b = rest_before(earlier, pair.b);
            pair.refresh_rest_error();

            for (slot, fitness) in [(pair.a, pair.fitness_a), (pair.b, pair.fitness_b)] {
                if let Some(competitor) = self.competitors.get_mut(slot.index()) {
                    competitor.fitness[current] = fitness;
                }
            }
        }
    }
}

/// Pairs between the end of `earlier` and the last one involving `slot`
fn rest_before(earlier: &[Pair], slot: SlotId) -> i32 {
    earlier
        .iter()
        .rev()
        .position(|p| p.involves(slot))
        .map_or(UNSCORED, |distance| distance as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped_graph(keys: &[Option<&str>]) -> OpponentGraph {
        let index = AffinityIndex::build(keys, |k| k.map(str::to_string));
        let mut graph = OpponentGraph::from_affinity(&index);
        for bucket in index.buckets() {
            graph.lock(bucket.group_id, bucket.len());
        }
        graph.build_preference_order();
        graph
    }

    #[test]
    fn test_slot_id_conversions() {
        assert_eq!(SlotId::from_index(0), SlotId(1));
        assert_eq!(SlotId(4).index(), 3);
        assert_eq!(SlotId(0).index(), 0);
    }

    #[test]
    fn test_preference_excludes_self_and_keeps_slot_order() {
        let mut graph = OpponentGraph::new(4);
        graph.build_preference_order();

        let prefs = &graph.competitor(SlotId(2)).unwrap().preference_order;
        assert_eq!(prefs, &vec![SlotId(1), SlotId(3), SlotId(4)]);
    }

    #[test]
    fn test_teammates_ranked_last() {
        let graph = grouped_graph(&[Some("A"), Some("A"), Some("A"), Some("B"), Some("C"), Some("D")]);

        let one = graph.competitor(SlotId(1)).unwrap();
        assert_eq!(one.lock_count, 3);
        assert_eq!(
            one.preference_order,
            vec![SlotId(4), SlotId(5), SlotId(6), SlotId(2), SlotId(3)]
        );

        // Singletons are not locked; they still rank locked fencers last
        let four = graph.competitor(SlotId(4)).unwrap();
        assert_eq!(four.lock_count, 0);
        assert_eq!(
            four.preference_order,
            vec![SlotId(5), SlotId(6), SlotId(1), SlotId(2), SlotId(3)]
        );
    }

    #[test]
    fn test_locked_rivals_rank_between_unlocked_and_teammates() {
        let graph = grouped_graph(&[Some("A"), Some("A"), Some("B"), Some("B"), Some("C")]);

        let one = graph.competitor(SlotId(1)).unwrap();
        assert_eq!(
            one.preference_order,
            vec![SlotId(5), SlotId(3), SlotId(4), SlotId(2)]
        );

        let five = graph.competitor(SlotId(5)).unwrap();
        assert_eq!(
            five.preference_order,
            vec![SlotId(1), SlotId(2), SlotId(3), SlotId(4)]
        );
    }

    #[test]
    fn test_unlocked_opponents_picked_first() {
        let mut graph = grouped_graph(&[Some("A"), Some("A"), Some("A"), Some("B"), Some("C"), Some("D")]);

        assert_eq!(graph.best_unscheduled_opponent(SlotId(4)), Some(SlotId(5)));

        graph.record_pair(SlotId(4), SlotId(5), 1);
        graph.record_pair(SlotId(4), SlotId(6), 2);
        // Only locked opponents remain; the one resting longest among them wins
        assert_eq!(graph.best_unscheduled_opponent(SlotId(4)), Some(SlotId(1)));

        // A teammate is only picked once every other opponent is met
        graph.record_pair(SlotId(1), SlotId(4), 3);
        graph.record_pair(SlotId(1), SlotId(5), 4);
        graph.record_pair(SlotId(1), SlotId(6), 5);
        assert_eq!(graph.best_unscheduled_opponent(SlotId(1)), Some(SlotId(2)));
    }

    #[test]
    fn test_lock_ignores_single_member_buckets() {
        let mut graph = OpponentGraph::from_affinity(&AffinityIndex::build(
            &[Some("A"), Some("B")],
            |k: &Option<&str>| k.map(str::to_string),
        ));
        graph.lock(GroupId(0), 1);
        assert!(!graph.competitor(SlotId(1)).unwrap().is_locked());
    }

    #[test]
    fn test_best_unscheduled_prefers_rested_opponents() {
        let mut graph = OpponentGraph::new(4);
        graph.build_preference_order();

        assert_eq!(graph.best_unscheduled_opponent(SlotId(1)), Some(SlotId(2)));

        graph.record_pair(SlotId(1), SlotId(2), 1);
        // 2 is now met, 3 and 4 are both unscored
        assert_eq!(graph.best_unscheduled_opponent(SlotId(1)), Some(SlotId(3)));

        graph.record_pair(SlotId(1), SlotId(3), 2);
        // 2 fenced before 1 and 3, so it has rested the longest
        assert_eq!(graph.best_unscheduled_opponent(SlotId(4)), Some(SlotId(2)));
    }

    #[test]
    fn test_best_unscheduled_exhausted() {
        let mut graph = OpponentGraph::new(2);
        graph.build_preference_order();
        graph.record_pair(SlotId(1), SlotId(2), 1);
        assert_eq!(graph.best_unscheduled_opponent(SlotId(1)), None);
        assert_eq!(graph.best_unscheduled_opponent(SlotId(9)), None);
    }

    #[test]
    fn test_slots_by_rest() {
        let mut graph = OpponentGraph::new(4);
        graph.record_pair(SlotId(1), SlotId(3), 1);
        assert_eq!(
            graph.slots_by_rest(),
            vec![SlotId(2), SlotId(4), SlotId(1), SlotId(3)]
        );
    }

    #[test]
    fn test_reset_fitness() {
        let mut graph = OpponentGraph::new(3);
        graph.reset_fitness(3);
        for competitor in graph.competitors() {
            assert_eq!(competitor.fitness, vec![UNSCORED; 3]);
        }
    }

    #[test]
    fn test_refresh_fitness_measures_rest() {
        let mut graph = OpponentGraph::new(4);
        graph.reset_fitness(6);
        let mut pairs: Vec<Pair> = [(1, 4), (2, 3), (1, 3), (2, 4), (3, 4), (1, 2)]
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| Pair::new(i as u32 + 1, SlotId(a), SlotId(b)))
            .collect();

        graph.refresh_fitness(&mut pairs);

        assert_eq!((pairs[0].fitness_a, pairs[0].fitness_b), (UNSCORED, UNSCORED));
        assert_eq!((pairs[2].fitness_a, pairs[2].fitness_b), (1, 0));
        assert!(pairs[2].rest_error);
        assert_eq!((pairs[5].fitness_a, pairs[5].fitness_b), (2, 1));
        assert!(!pairs[5].rest_error);

        let three = graph.competitor(SlotId(3)).unwrap();
        assert_eq!(three.fitness, vec![UNSCORED, UNSCORED, 0, UNSCORED, 1, UNSCORED]);
        assert_eq!(three.rest_histogram(3), vec![1, 1, 0, 0]);
    }
}
