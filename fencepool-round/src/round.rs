//! Round planning
//!
//! Chooses a configuration, spreads the roster and orders the bouts of
//! every pool.

use fencepool_core::{solve, Configuration, PairSequencer, ScheduleOutcome, SequencerConfig};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Affinity, RoundConfig};
use crate::error::RoundError;
use crate::fencer::Fencer;
use crate::spread::spread;
use crate::swap::Balance;

/// One bout with the fencers resolved to names
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bout {
    /// 1-based position in the pool's order
    pub order: u32,
    /// 1-based position in the pool of the first fencer
    pub a_slot: u32,
    pub a: String,
    /// 1-based position in the pool of the second fencer
    pub b_slot: u32,
    pub b: String,
    pub rest_error: bool,
}

/// One pool of the round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoolPlan {
    /// 1-based pool number
    pub number: u32,
    /// Members in slot order
    pub fencers: Vec<String>,
    pub bouts: Vec<Bout>,
    pub outcome: ScheduleOutcome,
}

impl PoolPlan {
    pub fn size(&self) -> usize {
        self.fencers.len()
    }

    pub fn rest_error_count(&self) -> usize {
        self.bouts.iter().filter(|b| b.rest_error).count()
    }
}

/// Every pool of a round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundPlan {
    pub configuration: Configuration,
    /// Result of spreading affinity groups across the pools
    pub balance: Balance,
    pub pools: Vec<PoolPlan>,
}

impl RoundPlan {
    /// Bouts scheduled across all pools
    pub fn bout_count(&self) -> usize {
        self.pools.iter().map(|p| p.bouts.len()).sum()
    }

    pub fn rest_error_count(&self) -> usize {
        self.pools.iter().map(|p| p.rest_error_count()).sum()
    }

    /// Fencers above their club's or nation's share of a pool
    pub fn overpopulation(&self) -> usize {
        self.balance.overpopulation
    }

    /// True when no pool stalled
    pub fn is_complete(&self) -> bool {
        self.pools.iter().all(|p| p.outcome.is_complete())
    }

    /// Look up a pool by its 1-based number
    pub fn pool(&self, number: u32) -> Option<&PoolPlan> {
        self.pools.iter().find(|p| p.number == number)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Lay out a full pool round for `fencers`
pub fn plan_round(fencers: &[Fencer], config: &RoundConfig) -> Result<RoundPlan, RoundError> {
    if fencers.is_empty() {
        return Err(RoundError::EmptyRoster);
    }

    let configuration = choose_configuration(fencers.len() as u32, config)?;
    let dealt = spread(fencers, &configuration, config.spread, config.affinity)?;

    tracing::info!(
        "Planning {} fencers as {} ({} bouts)",
        fencers.len(),
        configuration,
        configuration.match_count()
    );

    let members: Vec<Vec<&Fencer>> = dealt
        .pools
        .iter()
        .map(|pool| pool.iter().map(|&i| &fencers[i]).collect())
        .collect();

    let pools: Vec<PoolPlan> = if config.parallel {
        members
            .par_iter()
            .enumerate()
            .map(|(i, pool)| schedule_pool(i as u32 + 1, pool, config.affinity, config.sequencer))
            .collect()
    } else {
        members
            .iter()
            .enumerate()
            .map(|(i, pool)| schedule_pool(i as u32 + 1, pool, config.affinity, config.sequencer))
            .collect()
    };

    Ok(RoundPlan {
        configuration,
        balance: dealt.balance,
        pools,
    })
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// The requested configuration, or the solver's preferred one
fn choose_configuration(count: u32, config: &RoundConfig) -> Result<Configuration, RoundError> {
    match config.configuration {
        Some(configuration) if configuration.is_partition_of(count) => Ok(configuration),
        Some(configuration) => Err(RoundError::ConfigurationMismatch {
            configuration,
            fencers: count,
        }),
        None => solve(count)
            .best()
            .copied()
            .ok_or(RoundError::NoConfiguration { fencers: count }),
    }
}

/// Order the bouts of one pool
fn schedule_pool(
    number: u32,
    members: &[&Fencer],
    affinity: Affinity,
    sequencer_config: SequencerConfig,
) -> PoolPlan {
    let mut sequencer = PairSequencer::new(sequencer_config);
    let outcome = sequencer.schedule(members, |fencer| affinity.key(fencer));

    if let ScheduleOutcome::Stalled { placed, expected } = outcome {
        tracing::warn!("Pool {} stalled after {}/{} bouts", number, placed, expected);
    }

    let name_of = |slot: u32| {
        members
            .get(slot.saturating_sub(1) as usize)
            .map(|f| f.name.clone())
            .unwrap_or_default()
    };

    let bouts = sequencer
        .pairs()
        .iter()
        .map(|pair| Bout {
            order: pair.order,
            a_slot: pair.a.0,
            a: name_of(pair.a.0),
            b_slot: pair.b.0,
            b: name_of(pair.b.0),
            rest_error: pair.rest_error,
        })
        .collect();

    PoolPlan {
        number,
        fencers: members.iter().map(|f| f.name.clone()).collect(),
        bouts,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpreadMode;
    use std::collections::HashSet;

    fn club_roster(count: usize) -> Vec<Fencer> {
        let clubs = ["PARIS", "LYON", "NICE", "LILLE"];
        (0..count)
            .map(|i| {
                Fencer::new(format!("Fencer {}", i + 1))
                    .with_club(clubs[i % clubs.len()])
                    .with_rank(i as u32 + 1)
            })
            .collect()
    }

    #[test]
    fn test_empty_roster() {
        let result = plan_round(&[], &RoundConfig::default());
        assert!(matches!(result, Err(RoundError::EmptyRoster)));
    }

    #[test]
    fn test_single_fencer_has_no_configuration() {
        let result = plan_round(&club_roster(1), &RoundConfig::default());
        assert!(matches!(
            result,
            Err(RoundError::NoConfiguration { fencers: 1 })
        ));
    }

    #[test]
    fn test_best_configuration_is_used() {
        let fencers = club_roster(48);
        let plan = plan_round(&fencers, &RoundConfig::default()).unwrap();

        assert_eq!(plan.configuration, Configuration::new(8, 6, 0));
        assert_eq!(plan.pools.len(), 8);
        assert!(plan.pools.iter().all(|p| p.size() == 6));
        assert_eq!(plan.bout_count(), 8 * 15);
        assert_eq!(plan.bout_count() as u32, plan.configuration.match_count());
        assert!(plan.is_complete());
    }

    #[test]
    fn test_explicit_configuration() {
        let fencers = club_roster(13);
        let config = RoundConfig::default().with_configuration(Configuration::new(2, 6, 1));
        let plan = plan_round(&fencers, &config).unwrap();

        assert_eq!(plan.pool(1).map(|p| p.size()), Some(7));
        assert_eq!(plan.pool(2).map(|p| p.size()), Some(6));
        assert_eq!(plan.bout_count(), 21 + 15);
    }

    #[test]
    fn test_explicit_configuration_mismatch() {
        let fencers = club_roster(13);
        let config = RoundConfig::default().with_configuration(Configuration::new(2, 6, 0));
        let result = plan_round(&fencers, &config);
        assert!(matches!(
            result,
            Err(RoundError::ConfigurationMismatch { fencers: 13, .. })
        ));
    }

    #[test]
    fn test_bouts_cover_every_pair_of_each_pool() {
        let fencers = club_roster(37);
        let plan = plan_round(
            &fencers,
            &RoundConfig::default().with_spread(SpreadMode::Serpentine),
        )
        .unwrap();

        for pool in &plan.pools {
            let n = pool.size();
            let seen: HashSet<(u32, u32)> = pool
                .bouts
                .iter()
                .map(|b| (b.a_slot.min(b.b_slot), b.a_slot.max(b.b_slot)))
                .collect();
            assert_eq!(seen.len(), n * (n - 1) / 2);
            assert_eq!(pool.bouts.len(), n * (n - 1) / 2);

            for bout in &pool.bouts {
                assert_eq!(pool.fencers[bout.a_slot as usize - 1], bout.a);
                assert_eq!(pool.fencers[bout.b_slot as usize - 1], bout.b);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let fencers = club_roster(30);
        let parallel = plan_round(&fencers, &RoundConfig::default().parallel(true)).unwrap();
        let sequential = plan_round(&fencers, &RoundConfig::default().parallel(false)).unwrap();

        assert_eq!(parallel.pools.len(), sequential.pools.len());
        for (p, s) in parallel.pools.iter().zip(&sequential.pools) {
            assert_eq!(p.number, s.number);
            assert_eq!(p.bouts, s.bouts);
        }
    }

    #[test]
    fn test_clubmates_do_not_open_a_pool() {
        let fencers = vec![
            Fencer::new("A1").with_club("A"),
            Fencer::new("A2").with_club("A"),
            Fencer::new("A3").with_club("A"),
            Fencer::new("B1").with_club("B"),
            Fencer::new("C1").with_club("C"),
            Fencer::new("D1").with_club("D"),
        ];
        let config = RoundConfig::default().with_configuration(Configuration::new(1, 6, 0));
        let plan = plan_round(&fencers, &config).unwrap();

        let first = &plan.pools[0].bouts[0];
        assert!(!(first.a.starts_with('A') && first.b.starts_with('A')));
    }

    #[test]
    fn test_serpentine_round_spreads_clubs() {
        // Twelve fencers, three per club, ranked so snake dealing pairs clubmates
        let clubs = ["A", "B", "C", "C", "B", "A", "A", "B", "C", "D", "D", "D"];
        let fencers: Vec<Fencer> = clubs
            .iter()
            .enumerate()
            .map(|(i, club)| {
                Fencer::new(format!("{}{}", club, i + 1))
                    .with_club(*club)
                    .with_rank(i as u32 + 1)
            })
            .collect();
        let config = RoundConfig::default()
            .with_configuration(Configuration::new(3, 4, 0))
            .with_spread(SpreadMode::Serpentine);
        let plan = plan_round(&fencers, &config).unwrap();

        assert_eq!(plan.overpopulation(), 0);
        assert!(plan.balance.swaps > 0);
        for pool in &plan.pools {
            let clubs: HashSet<char> = pool.fencers.iter().filter_map(|n| n.chars().next()).collect();
            assert_eq!(clubs.len(), pool.size());
        }
    }

    #[test]
    fn test_sequential_round_reports_overpopulation() {
        let fencers: Vec<Fencer> = (0..8)
            .map(|i| {
                Fencer::new(format!("Fencer {}", i + 1))
                    .with_club(if i < 4 { "PARIS" } else { "LYON" })
                    .with_rank(i as u32 + 1)
            })
            .collect();
        let config = RoundConfig::default().with_configuration(Configuration::new(2, 4, 0));
        let plan = plan_round(&fencers, &config).unwrap();

        // Each club may hold two places per pool; sequential fill gives one club each pool
        assert_eq!(plan.overpopulation(), 4);
        assert_eq!(plan.balance.swaps, 0);
    }

    #[test]
    fn test_plan_serializes_to_json() {
        let plan = plan_round(&club_roster(8), &RoundConfig::default()).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        assert!(json.contains("\"configuration\""));
        assert!(json.contains("\"bouts\""));
        assert!(json.contains("\"overpopulation\""));
    }
}
