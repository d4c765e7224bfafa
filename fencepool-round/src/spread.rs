//! Dealing fencers into pools
//!
//! Level 3 - Steps

use fencepool_core::{AffinityIndex, Configuration, GroupId, SlotId};

use crate::config::{Affinity, SpreadMode};
use crate::error::RoundError;
use crate::fencer::Fencer;
use crate::swap::{balance_pools, overpopulation, Balance};

/// Pools of a round, as indices into the roster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spread {
    /// Members of each pool in seeding order, pools in configuration order
    pub pools: Vec<Vec<usize>>,
    pub balance: Balance,
}

/// Split the roster into pools
///
/// Fencers are dealt in seeding order: ranked fencers by ascending rank,
/// then unranked fencers in roster order. Overloaded pools come first.
/// Serpentine dealing is followed by a balancing pass that spreads every
/// `affinity` group evenly across the pools.
pub fn spread(
    fencers: &[Fencer],
    configuration: &Configuration,
    mode: SpreadMode,
    affinity: Affinity,
) -> Result<Spread, RoundError> {
    let count = fencers.len() as u32;
    if !configuration.is_partition_of(count) {
        return Err(RoundError::ConfigurationMismatch {
            configuration: *configuration,
            fencers: count,
        });
    }

    let seeding = seeding_order(fencers);
    let capacities: Vec<usize> = configuration
        .pool_sizes()
        .into_iter()
        .map(|size| size as usize)
        .collect();

    let groups = affinity_groups(fencers, affinity);

    let (mut pools, balance) = match mode {
        SpreadMode::Sequential => {
            let pools = deal_sequential(&seeding, &capacities);
            let balance = Balance {
                swaps: 0,
                overpopulation: overpopulation(&pools, &groups),
            };
            (pools, balance)
        }
        SpreadMode::Serpentine => {
            let mut pools = deal_serpentine(&seeding, &capacities);
            let seeds = seed_positions(&seeding);
            let balance = balance_pools(&mut pools, &groups, &seeds);
            for pool in &mut pools {
                pool.sort_by_key(|&fencer| seeds[fencer]);
            }
            (pools, balance)
        }
    };
    pools.shrink_to_fit();

    tracing::debug!(
        "Spread {} fencers into {} ({:?}, overpopulation {})",
        count,
        configuration,
        mode,
        balance.overpopulation
    );

    Ok(Spread { pools, balance })
}

/// Group of every fencer under `affinity`, by roster index
fn affinity_groups(fencers: &[Fencer], affinity: Affinity) -> Vec<Option<GroupId>> {
    let index = AffinityIndex::build(fencers, |fencer| affinity.key(fencer));
    (0..fencers.len())
        .map(|i| index.group_of(SlotId::from_index(i)))
        .collect()
}

/// Seeding position of every fencer, by roster index
fn seed_positions(seeding: &[usize]) -> Vec<usize> {
    let mut seeds = vec![0; seeding.len()];
    for (position, &fencer) in seeding.iter().enumerate() {
        seeds[fencer] = position;
    }
    seeds
}

/// Roster indices sorted by seed
fn seeding_order(fencers: &[Fencer]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fencers.len()).collect();
    // Stable: equal or missing ranks keep roster order
    order.sort_by_key(|&i| (fencers[i].rank.is_none(), fencers[i].rank));
    order
}

fn deal_sequential(seeding: &[usize], capacities: &[usize]) -> Vec<Vec<usize>> {
    let mut remaining = seeding.iter().copied();
    capacities
        .iter()
        .map(|&capacity| remaining.by_ref().take(capacity).collect())
        .collect()
}

fn deal_serpentine(seeding: &[usize], capacities: &[usize]) -> Vec<Vec<usize>> {
    let pool_count = capacities.len();
    let mut pools: Vec<Vec<usize>> = capacities.iter().map(|&c| Vec::with_capacity(c)).collect();
    if pool_count == 0 {
        return pools;
    }

    // Snake walk: 0..P, P-1..0, 0..P, ...
    let mut walk = (0..pool_count)
        .chain((0..pool_count).rev())
        .cycle();

    for &fencer in seeding {
        // Total capacity equals the roster size, so an open pool always exists
        if let Some(pool) = walk.by_ref().find(|&p| pools[p].len() < capacities[p]) {
            pools[pool].push(fencer);
        }
    }

    pools
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(count: usize) -> Vec<Fencer> {
        (1..=count)
            .map(|i| Fencer::new(format!("F{i}")).with_rank(i as u32))
            .collect()
    }

    fn deal(fencers: &[Fencer], configuration: Configuration, mode: SpreadMode) -> Vec<Vec<usize>> {
        spread(fencers, &configuration, mode, Affinity::Club)
            .unwrap()
            .pools
    }

    fn sizes(pools: &[Vec<usize>]) -> Vec<usize> {
        pools.iter().map(|p| p.len()).collect()
    }

    #[test]
    fn test_sequential_fills_in_order() {
        let fencers = roster(13);
        let pools = deal(&fencers, Configuration::new(2, 6, 1), SpreadMode::Sequential);

        assert_eq!(sizes(&pools), vec![7, 6]);
        assert_eq!(pools[0], vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(pools[1], vec![7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_serpentine_alternates_direction() {
        let fencers = roster(8);
        let pools = deal(&fencers, Configuration::new(2, 4, 0), SpreadMode::Serpentine);

        assert_eq!(pools[0], vec![0, 3, 4, 7]);
        assert_eq!(pools[1], vec![1, 2, 5, 6]);
    }

    #[test]
    fn test_serpentine_skips_full_pools() {
        // 3 pools of 4 or 5, one overloaded: the last pass only reaches pool 1
        let fencers = roster(13);
        let pools = deal(&fencers, Configuration::new(3, 4, 1), SpreadMode::Serpentine);

        assert_eq!(sizes(&pools), vec![5, 4, 4]);
        assert_eq!(pools[0], vec![0, 5, 6, 11, 12]);
        assert_eq!(pools[1], vec![1, 4, 7, 10]);
        assert_eq!(pools[2], vec![2, 3, 8, 9]);
    }

    #[test]
    fn test_every_fencer_placed_once() {
        let fencers = roster(37);
        let configuration = Configuration::new(6, 6, 1);

        for mode in [SpreadMode::Sequential, SpreadMode::Serpentine] {
            let pools = deal(&fencers, configuration, mode);
            assert_eq!(
                sizes(&pools),
                configuration
                    .pool_sizes()
                    .into_iter()
                    .map(|s| s as usize)
                    .collect::<Vec<_>>()
            );

            let mut placed: Vec<usize> = pools.into_iter().flatten().collect();
            placed.sort_unstable();
            assert_eq!(placed, (0..37).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_ranks_drive_seeding() {
        let fencers = vec![
            Fencer::new("unranked"),
            Fencer::new("second").with_rank(2),
            Fencer::new("first").with_rank(1),
            Fencer::new("also unranked"),
        ];
        let pools = deal(&fencers, Configuration::new(1, 4, 0), SpreadMode::Sequential);
        assert_eq!(pools[0], vec![2, 1, 0, 3]);
    }

    /// Twelve ranked fencers from four clubs of three
    fn club_field() -> Vec<Fencer> {
        let clubs = ["A", "B", "C", "C", "B", "A", "A", "B", "C", "D", "D", "D"];
        clubs
            .iter()
            .enumerate()
            .map(|(i, club)| {
                Fencer::new(format!("F{}", i + 1))
                    .with_rank(i as u32 + 1)
                    .with_club(*club)
            })
            .collect()
    }

    fn clubs_of(fencers: &[Fencer], pool: &[usize]) -> Vec<String> {
        let mut clubs: Vec<String> = pool
            .iter()
            .filter_map(|&i| fencers[i].club.clone())
            .collect();
        clubs.sort();
        clubs
    }

    #[test]
    fn test_serpentine_keeps_clubmates_apart() {
        let fencers = club_field();
        let result = spread(
            &fencers,
            &Configuration::new(3, 4, 0),
            SpreadMode::Serpentine,
            Affinity::Club,
        )
        .unwrap();

        // Plain snake dealing puts two As in pool 1, two Bs in pool 2, two Cs in pool 3
        assert_eq!(result.balance.overpopulation, 0);
        assert_eq!(result.balance.swaps, 3);
        for pool in &result.pools {
            assert_eq!(clubs_of(&fencers, pool), vec!["A", "B", "C", "D"]);
        }

        // Heads of the pools stay the top three seeds, members stay in seed order
        assert_eq!(result.pools[0][0], 0);
        assert_eq!(result.pools[1][0], 1);
        assert_eq!(result.pools[2][0], 2);
        for pool in &result.pools {
            assert!(pool.windows(2).all(|w| fencers[w[0]].rank < fencers[w[1]].rank));
        }
    }

    #[test]
    fn test_sequential_reports_overpopulation() {
        let fencers = club_field();
        let result = spread(
            &fencers,
            &Configuration::new(3, 4, 0),
            SpreadMode::Sequential,
            Affinity::Club,
        )
        .unwrap();

        // [A B C C] [B A A B] [C D D D], one member of each club per pool allowed
        assert_eq!(result.balance.swaps, 0);
        assert_eq!(result.balance.overpopulation, 1 + 2 + 2);
    }

    #[test]
    fn test_no_affinity_skips_balancing() {
        let fencers = club_field();
        let result = spread(
            &fencers,
            &Configuration::new(3, 4, 0),
            SpreadMode::Serpentine,
            Affinity::None,
        )
        .unwrap();

        assert_eq!(result.balance, Balance::default());
        assert_eq!(result.pools[0], vec![0, 5, 6, 11]);
    }

    #[test]
    fn test_mismatched_configuration_rejected() {
        let fencers = roster(10);
        let result = spread(
            &fencers,
            &Configuration::new(2, 6, 0),
            SpreadMode::Sequential,
            Affinity::Club,
        );
        assert!(matches!(
            result,
            Err(RoundError::ConfigurationMismatch { fencers: 10, .. })
        ));
    }
}
