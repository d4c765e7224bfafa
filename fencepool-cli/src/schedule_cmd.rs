//! Schedule command - order the bouts of a single pool
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: check_size(), parse_groups(), report_text(), report_json()
//! - Level 4: argument types

use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;

use fencepool_core::{
    OrderingStyle, Pair, PairSequencer, ScheduleOutcome, SequencerConfig, SequencerState,
    MAX_POOL_SIZE,
};

/// Largest pool the command will order
///
/// The opponent graph and pair list grow with the square of the pool size.
pub const MAX_SCHEDULE_SIZE: usize = 64;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ScheduleArgs {
    /// Number of fencers in the pool
    #[arg(long)]
    pub size: usize,

    /// Comma-separated affinity keys, one per slot (empty = no key)
    #[arg(long, value_delimiter = ',')]
    pub groups: Option<Vec<String>>,

    /// Use kendo reference orders
    #[arg(long)]
    pub kendo: bool,

    /// Print the rest diagnostics after the order
    #[arg(long)]
    pub dump: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: ScheduleArgs) -> Result<()> {
    check_size(args.size)?;
    if args.size > MAX_POOL_SIZE {
        tracing::info!(
            "Pool of {} has no reference order, using the greedy builder",
            args.size
        );
    }

    let groups = parse_groups(&args)?;

    let style = if args.kendo {
        OrderingStyle::Kendo
    } else {
        OrderingStyle::Fencing
    };
    let mut sequencer = PairSequencer::new(SequencerConfig::default().with_style(style));
    let outcome = sequencer.schedule(&groups, |key| key.clone());

    if args.json {
        report_json(&sequencer, outcome)?;
    } else {
        report_text(&sequencer, outcome);
    }

    if args.dump {
        println!("\n{}", sequencer.dump());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn check_size(size: usize) -> Result<()> {
    ensure!(size >= 2, "A pool needs at least 2 fencers");
    ensure!(
        size <= MAX_SCHEDULE_SIZE,
        "Pool of {} is too large (at most {} fencers)",
        size,
        MAX_SCHEDULE_SIZE
    );
    Ok(())
}

/// One optional key per slot
fn parse_groups(args: &ScheduleArgs) -> Result<Vec<Option<String>>> {
    let Some(groups) = &args.groups else {
        return Ok(vec![None; args.size]);
    };

    ensure!(
        groups.len() == args.size,
        "Expected {} group keys, got {}",
        args.size,
        groups.len()
    );

    Ok(groups
        .iter()
        .map(|g| {
            let key = g.trim();
            (!key.is_empty()).then(|| key.to_string())
        })
        .collect())
}

fn report_text(sequencer: &PairSequencer, outcome: ScheduleOutcome) {
    let path = match sequencer.state() {
        SequencerState::Scored(path) | SequencerState::Built(path) => format!("{:?}", path),
        SequencerState::Empty => "none".to_string(),
    };

    println!(
        "\n=== Pool of {} ({} bouts, {}) ===",
        sequencer.pool_size(),
        sequencer.len(),
        path
    );

    for pair in sequencer.pairs() {
        println!("{}", format_pair(pair));
    }

    println!("\nRest errors: {}", sequencer.rest_error_count());
    if let ScheduleOutcome::Stalled { placed, expected } = outcome {
        println!("Stalled after {}/{} bouts", placed, expected);
    }
}

fn report_json(sequencer: &PairSequencer, outcome: ScheduleOutcome) -> Result<()> {
    #[derive(Serialize)]
    struct JsonOutput<'a> {
        pool_size: usize,
        state: SequencerState,
        outcome: ScheduleOutcome,
        rest_errors: usize,
        pairs: &'a [Pair],
    }

    let output = JsonOutput {
        pool_size: sequencer.pool_size(),
        state: sequencer.state(),
        outcome,
        rest_errors: sequencer.rest_error_count(),
        pairs: sequencer.pairs(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_pair(pair: &Pair) -> String {
    let flag = if pair.rest_error { "  !" } else { "" };
    format!("{:3}: {:>2} - {:<2}{}", pair.order, pair.a, pair.b, flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(size: usize, groups: Option<&str>) -> ScheduleArgs {
        ScheduleArgs {
            size,
            groups: groups.map(|g| g.split(',').map(str::to_string).collect()),
            kendo: false,
            dump: false,
            json: false,
        }
    }

    #[test]
    fn test_size_bounds() {
        assert!(check_size(1).is_err());
        assert!(check_size(2).is_ok());
        assert!(check_size(MAX_SCHEDULE_SIZE).is_ok());
        assert!(check_size(MAX_SCHEDULE_SIZE + 1).is_err());
        assert!(check_size(100_000).is_err());
    }

    #[test]
    fn test_oversized_pool_rejected_before_scheduling() {
        assert!(run(args(100_000, None)).is_err());
    }

    #[test]
    fn test_parse_groups() {
        let groups = parse_groups(&args(4, Some("A, ,B,A"))).unwrap();
        assert_eq!(
            groups,
            vec![
                Some("A".to_string()),
                None,
                Some("B".to_string()),
                Some("A".to_string())
            ]
        );

        assert!(parse_groups(&args(3, Some("A,B"))).is_err());
        assert_eq!(parse_groups(&args(3, None)).unwrap(), vec![None; 3]);
    }
}
