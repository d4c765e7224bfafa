//! Spreading affinity groups evenly across pools
//!
//! Level 3 - Steps
//!
//! A group of `n` fencers over `P` pools may hold at most `ceil(n / P)`
//! members in any pool. Fencers above that share are exchanged with a
//! fencer of similar seed from a pool that still has room for them. Pool
//! leaders (the first `P` seeds) never move.

use std::cmp::Reverse;

use fencepool_core::GroupId;
use serde::{Deserialize, Serialize};

/// Outcome of a balancing pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Fencer exchanges performed
    pub swaps: usize,
    /// Fencers still above their group's share of a pool
    pub overpopulation: usize,
}

/// Exchange `pools[from][from_index]` with `pools[to][to_index]`
#[derive(Clone, Copy, Debug)]
struct Exchange {
    from: usize,
    from_index: usize,
    to: usize,
    to_index: usize,
}

/// Per-pool head counts of every group
struct GroupLedger<'a> {
    /// Group of each fencer, by roster index
    groups: &'a [Option<GroupId>],
    /// Seeding position of each fencer, by roster index
    seeds: &'a [usize],
    pool_count: usize,
    /// Most members of a group one pool should hold
    limits: Vec<u32>,
    /// Indexed by pool, then group
    counts: Vec<Vec<u32>>,
}

impl<'a> GroupLedger<'a> {
    fn new(pools: &[Vec<usize>], groups: &'a [Option<GroupId>], seeds: &'a [usize]) -> Self {
        let group_count = groups
            .iter()
            .flatten()
            .map(|g| g.0 as usize + 1)
            .max()
            .unwrap_or(0);
        let pool_count = pools.len();

        let mut ledger = Self {
            groups,
            seeds,
            pool_count,
            limits: vec![0; group_count],
            counts: vec![vec![0; group_count]; pool_count],
        };

        let mut totals = vec![0u32; group_count];
        for (p, pool) in pools.iter().enumerate() {
            for &fencer in pool {
                if let Some(g) = ledger.group(fencer) {
                    ledger.counts[p][g] += 1;
                    totals[g] += 1;
                }
            }
        }

        let divisor = pool_count.max(1) as u32;
        ledger.limits = totals
            .iter()
            .map(|&total| (total + divisor - 1) / divisor)
            .collect();
        ledger
    }

    fn group(&self, fencer: usize) -> Option<usize> {
        self.groups
            .get(fencer)
            .copied()
            .flatten()
            .map(|g| g.0 as usize)
    }

    fn seed(&self, fencer: usize) -> usize {
        self.seeds.get(fencer).copied().unwrap_or(usize::MAX)
    }

    fn is_leader(&self, fencer: usize) -> bool {
        self.seed(fencer) < self.pool_count
    }

    fn is_crowded(&self, pool: usize, group: usize) -> bool {
        self.counts[pool][group] > self.limits[group]
    }

    fn has_room(&self, pool: usize, group: usize) -> bool {
        self.counts[pool][group] < self.limits[group]
    }

    /// True when `fencer` can take the place of a `leaving` group member in `pool`
    fn can_enter(&self, fencer: usize, pool: usize, leaving: usize) -> bool {
        match self.group(fencer) {
            None => true,
            Some(g) => g != leaving && self.has_room(pool, g),
        }
    }

    fn overpopulation(&self) -> usize {
        self.counts
            .iter()
            .map(|pool| {
                pool.iter()
                    .zip(&self.limits)
                    .map(|(&count, &limit)| count.saturating_sub(limit) as usize)
                    .sum::<usize>()
            })
            .sum()
    }

    /// First exchange that lowers the overpopulation
    fn find_exchange(&self, pools: &[Vec<usize>]) -> Option<Exchange> {
        for (from, pool) in pools.iter().enumerate() {
            let mut movable: Vec<(usize, usize, usize)> = pool
                .iter()
                .enumerate()
                .filter(|&(_, &fencer)| !self.is_leader(fencer))
                .filter_map(|(i, &fencer)| {
                    let group = self.group(fencer)?;
                    self.is_crowded(from, group).then_some((i, fencer, group))
                })
                .collect();
            // Lowest seeds leave first
            movable.sort_by_key(|&(_, fencer, _)| Reverse(self.seed(fencer)));

            for (from_index, fencer, group) in movable {
                let partner = pools
                    .iter()
                    .enumerate()
                    .filter(|&(to, _)| to != from && self.has_room(to, group))
                    .flat_map(|(to, other)| {
                        other
                            .iter()
                            .enumerate()
                            .map(move |(to_index, &candidate)| (to, to_index, candidate))
                    })
                    .filter(|&(_, _, candidate)| {
                        !self.is_leader(candidate) && self.can_enter(candidate, from, group)
                    })
                    .min_by_key(|&(to, _, candidate)| {
                        (self.seed(candidate).abs_diff(self.seed(fencer)), to)
                    });

                if let Some((to, to_index, _)) = partner {
                    return Some(Exchange {
                        from,
                        from_index,
                        to,
                        to_index,
                    });
                }
            }
        }

        None
    }

    fn apply(&mut self, pools: &mut [Vec<usize>], exchange: Exchange) {
        let leaving = pools[exchange.from][exchange.from_index];
        let joining = pools[exchange.to][exchange.to_index];
        pools[exchange.from][exchange.from_index] = joining;
        pools[exchange.to][exchange.to_index] = leaving;

        if let Some(g) = self.group(leaving) {
            self.counts[exchange.from][g] -= 1;
            self.counts[exchange.to][g] += 1;
        }
        if let Some(g) = self.group(joining) {
            self.counts[exchange.to][g] -= 1;
            self.counts[exchange.from][g] += 1;
        }
    }
}

/// Exchange fencers until no group exceeds its share of a pool where avoidable
///
/// `groups` and `seeds` are indexed by roster position. Every exchange
/// strictly lowers the overpopulation, so the pass terminates. Pool sizes
/// are unchanged.
pub fn balance_pools(
    pools: &mut [Vec<usize>],
    groups: &[Option<GroupId>],
    seeds: &[usize],
) -> Balance {
    let mut ledger = GroupLedger::new(pools, groups, seeds);
    let before = ledger.overpopulation();

    let mut swaps = 0;
    while let Some(exchange) = ledger.find_exchange(pools) {
        ledger.apply(pools, exchange);
        swaps += 1;
    }

    let overpopulation = ledger.overpopulation();
    tracing::debug!(
        "Balanced pools: {} swaps, overpopulation {} -> {}",
        swaps,
        before,
        overpopulation
    );

    Balance {
        swaps,
        overpopulation,
    }
}

/// Fencers above their group's share of a pool
pub fn overpopulation(pools: &[Vec<usize>], groups: &[Option<GroupId>]) -> usize {
    GroupLedger::new(pools, groups, &[]).overpopulation()
}
