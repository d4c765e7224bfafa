//! Pool configurations - how many pools, of which size
//!
//! A configuration splits N fencers into `pool_count` pools of `base_size`,
//! where `overloaded_pool_count` of them take one extra fencer to absorb
//! the remainder.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ordering::{pair_count, MAX_POOL_SIZE};

/// Pools strictly smaller than this are preferred when picking the best configuration
pub const PREFERRED_SIZE_LIMIT: u32 = 7;

/// Fallback size for the best configuration, only without overloaded pools
pub const FALLBACK_POOL_SIZE: u32 = 7;

/// Partition plan of N fencers into pools
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    /// Total number of pools
    pub pool_count: u32,
    /// Size of a regular pool
    pub base_size: u32,
    /// Pools holding `base_size + 1` fencers
    pub overloaded_pool_count: u32,
}

impl Configuration {
    pub const fn new(pool_count: u32, base_size: u32, overloaded_pool_count: u32) -> Self {
        Self {
            pool_count,
            base_size,
            overloaded_pool_count,
        }
    }

    /// Number of fencers the configuration places
    pub fn fencer_count(&self) -> u32 {
        self.pool_count * self.base_size + self.overloaded_pool_count
    }

    /// Check the partition invariant against a fencer count
    pub fn is_partition_of(&self, nb_players: u32) -> bool {
        self.pool_count > 0
            && self.overloaded_pool_count < self.pool_count
            && self.fencer_count() == nb_players
    }

    /// Size of every pool, overloaded pools first
    pub fn pool_sizes(&self) -> Vec<u32> {
        (0..self.pool_count)
            .map(|i| {
                if i < self.overloaded_pool_count {
                    self.base_size + 1
                } else {
                    self.base_size
                }
            })
            .collect()
    }

    /// Total bouts fenced across the whole round
    pub fn match_count(&self) -> u32 {
        let regular = self.pool_count - self.overloaded_pool_count;
        let regular_matches = pair_count(self.base_size as usize) as u32;
        let overloaded_matches = pair_count(self.base_size as usize + 1) as u32;

        regular * regular_matches + self.overloaded_pool_count * overloaded_matches
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.overloaded_pool_count > 0 {
            write!(
                f,
                "{} pools of {} or {}",
                self.pool_count,
                self.base_size,
                self.base_size + 1
            )
        } else {
            write!(f, "{} pools of {}", self.pool_count, self.base_size)
        }
    }
}

/// Every feasible configuration for a fencer count, plus the preferred one
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSet {
    /// Fencer count the set was computed for
    pub nb_players: u32,
    /// Candidates in ascending base size
    pub configurations: Vec<Configuration>,
    /// Index of the preferred candidate, if any
    pub best: Option<usize>,
}

impl ConfigurationSet {
    /// The preferred configuration, if one was marked
    pub fn best(&self) -> Option<&Configuration> {
        self.best.and_then(|i| self.configurations.get(i))
    }

    /// Look up the candidate for a given base size
    pub fn with_base_size(&self, base_size: u32) -> Option<&Configuration> {
        self.configurations.iter().find(|c| c.base_size == base_size)
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Enumerate the feasible configurations for `nb_players` fencers
///
/// Fewer than two fencers yields an empty set.
pub fn solve(nb_players: u32) -> ConfigurationSet {
    let mut set = ConfigurationSet {
        nb_players,
        ..Default::default()
    };

    if nb_players < 2 {
        return set;
    }

    let max_size = max_pool_size_for(nb_players);

    for size in 2..=max_size.min(nb_players) {
        if let Some(config) = configuration_for_size(nb_players, size) {
            register(&mut set, config);
        }
    }

    tracing::debug!(
        "{} fencers: {} configurations, best={:?}",
        nb_players,
        set.configurations.len(),
        set.best()
    );

    set
}

/// Largest base size worth trying
///
/// The top size is only used when it divides the field exactly, otherwise
/// its overloaded pools would exceed the reference tables.
fn max_pool_size_for(nb_players: u32) -> u32 {
    let max = MAX_POOL_SIZE as u32;
    if nb_players % max == 0 {
        max
    } else {
        max - 1
    }
}

/// Configuration built on `size`, if the remainder can be absorbed
fn configuration_for_size(nb_players: u32, size: u32) -> Option<Configuration> {
    if nb_players % size == 0 {
        return Some(Configuration::new(nb_players / size, size, 0));
    }

    (1..nb_players / size).find_map(|regular| {
        let rest = nb_players - size * regular;
        (rest % (size + 1) == 0).then(|| {
            let overloaded = rest / (size + 1);
            Configuration::new(regular + overloaded, size, overloaded)
        })
    })
}

/// Append a candidate and update the best pick
///
/// Candidates arrive in ascending base size. A small pool always wins over
/// the fallback size, and among small pools the largest one wins.
fn register(set: &mut ConfigurationSet, config: Configuration) {
    set.configurations.push(config);
    let index = set.configurations.len() - 1;

    if config.base_size < PREFERRED_SIZE_LIMIT {
        set.best = Some(index);
    } else if config.base_size == FALLBACK_POOL_SIZE
        && config.overloaded_pool_count == 0
        && set.best().is_none()
    {
        set.best = Some(index);
    }
}
