//! Round command - lay out a pool round from a roster
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_roster(), build_config(), report_results()
//! - Level 4: argument types and formatting utilities

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use fencepool_core::{Configuration, OrderingStyle};
use fencepool_round::{plan_round, Affinity, Fencer, PoolPlan, RoundConfig, RoundPlan, SpreadMode};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RoundArgs {
    /// Roster JSON file: [{"name": ..., "club": ...}, ...]
    #[arg(long, value_name = "FILE")]
    pub roster: PathBuf,

    /// Number of pools (with --size and --overloaded)
    #[arg(long, requires_all = ["size", "overloaded"])]
    pub pools: Option<u32>,

    /// Base pool size
    #[arg(long, requires_all = ["pools", "overloaded"])]
    pub size: Option<u32>,

    /// Pools holding one extra fencer
    #[arg(long, requires_all = ["pools", "size"])]
    pub overloaded: Option<u32>,

    /// Deal seeds in snake order instead of filling pools in turn
    #[arg(long)]
    pub serpentine: bool,

    /// Order pools one after the other on the current thread
    #[arg(long)]
    pub sequential_only: bool,

    /// Fencer attribute to keep apart in the bout order
    #[arg(long, value_enum, default_value = "club")]
    pub affinity: AffinityArg,

    /// Use kendo reference orders
    #[arg(long)]
    pub kendo: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AffinityArg {
    None,
    Club,
    Nation,
}

impl From<AffinityArg> for Affinity {
    fn from(arg: AffinityArg) -> Self {
        match arg {
            AffinityArg::None => Affinity::None,
            AffinityArg::Club => Affinity::Club,
            AffinityArg::Nation => Affinity::Nation,
        }
    }
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run round command
///
/// 1. Load the roster
/// 2. Plan the round
/// 3. Report the pools and their bout orders
pub fn run(args: RoundArgs) -> Result<()> {
    let fencers = load_roster(&args.roster)?;
    let config = build_config(&args);

    tracing::info!("Loaded {} fencers from {}", fencers.len(), args.roster.display());

    let plan = plan_round(&fencers, &config)
        .with_context(|| format!("Failed to plan round for {}", args.roster.display()))?;

    report_results(&plan, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_roster(path: &Path) -> Result<Vec<Fencer>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster: {}", path.display()))?;
    let fencers: Vec<Fencer> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse roster: {}", path.display()))?;
    Ok(fencers)
}

fn build_config(args: &RoundArgs) -> RoundConfig {
    let spread = if args.serpentine {
        SpreadMode::Serpentine
    } else {
        SpreadMode::Sequential
    };
    let style = if args.kendo {
        OrderingStyle::Kendo
    } else {
        OrderingStyle::Fencing
    };

    let mut config = RoundConfig::default()
        .with_spread(spread)
        .with_affinity(args.affinity.into())
        .with_style(style)
        .parallel(!args.sequential_only);

    if let (Some(pools), Some(size), Some(overloaded)) = (args.pools, args.size, args.overloaded) {
        config = config.with_configuration(Configuration::new(pools, size, overloaded));
    }

    config
}

fn report_results(plan: &RoundPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!(
        "\n=== {} ({} bouts) ===",
        plan.configuration,
        plan.bout_count()
    );
    for pool in &plan.pools {
        print_pool(pool);
    }

    println!("\nRest errors: {}", plan.rest_error_count());
    println!(
        "Overpopulation: {} ({} swaps)",
        plan.overpopulation(),
        plan.balance.swaps
    );
    if !plan.is_complete() {
        println!("Some pools could not be fully ordered");
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn print_pool(pool: &PoolPlan) {
    println!("\nPool {} ({} fencers)", pool.number, pool.size());
    for (slot, name) in pool.fencers.iter().enumerate() {
        println!("  {:>2}. {}", slot + 1, name);
    }

    println!();
    for bout in &pool.bouts {
        let flag = if bout.rest_error { "  !" } else { "" };
        println!(
            "  {:3}: {} - {}{}",
            bout.order, bout.a, bout.b, flag
        );
    }
}
