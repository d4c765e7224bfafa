//! Configs command - list the ways to split a field into pools
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: report_text(), report_json()
//! - Level 4: formatting utilities

use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;

use fencepool_core::{solve, Configuration, ConfigurationSet};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ConfigsArgs {
    /// Number of checked-in fencers
    #[arg(long)]
    pub fencers: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: ConfigsArgs) -> Result<()> {
    ensure!(args.fencers >= 2, "Need at least 2 fencers, got {}", args.fencers);

    let set = solve(args.fencers);
    tracing::debug!("{} configurations for {} fencers", set.len(), args.fencers);

    if args.json {
        report_json(&set)
    } else {
        report_text(&set);
        Ok(())
    }
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn report_text(set: &ConfigurationSet) {
    println!("\n=== {} fencers ===", set.nb_players);

    let best = set.best();
    for configuration in &set.configurations {
        let marker = if Some(configuration) == best { "*" } else { " " };
        println!("{} {}", marker, describe(configuration));
    }

    if best.is_none() {
        println!("\nNo preferred configuration");
    }
}

fn report_json(set: &ConfigurationSet) -> Result<()> {
    #[derive(Serialize)]
    struct JsonConfiguration {
        label: String,
        pool_count: u32,
        base_size: u32,
        overloaded_pool_count: u32,
        match_count: u32,
        best: bool,
    }

    #[derive(Serialize)]
    struct JsonOutput {
        fencers: u32,
        configurations: Vec<JsonConfiguration>,
    }

    let best = set.best();
    let output = JsonOutput {
        fencers: set.nb_players,
        configurations: set
            .configurations
            .iter()
            .map(|c| JsonConfiguration {
                label: c.to_string(),
                pool_count: c.pool_count,
                base_size: c.base_size,
                overloaded_pool_count: c.overloaded_pool_count,
                match_count: c.match_count(),
                best: Some(c) == best,
            })
            .collect(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn describe(configuration: &Configuration) -> String {
    format!(
        "{:<22} {:>4} bouts",
        configuration.to_string(),
        configuration.match_count()
    )
}
