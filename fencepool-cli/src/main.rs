//! FENCEPOOL CLI - Command-line interface
//!
//! Commands:
//! - configs: List the pool configurations for a field
//! - schedule: Order the bouts of a single pool
//! - round: Lay out a full pool round from a roster

mod configs_cmd;
mod round_cmd;
mod schedule_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fencepool")]
#[command(about = "Fencing pool partitioning and bout ordering")]
struct Cli {
    /// Log scheduling decisions
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List pool configurations for a number of fencers
    Configs(configs_cmd::ConfigsArgs),
    /// Order the bouts of one pool
    Schedule(schedule_cmd::ScheduleArgs),
    /// Plan a pool round from a JSON roster
    Round(round_cmd::RoundArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Configs(args) => configs_cmd::run(args),
        Commands::Schedule(args) => schedule_cmd::run(args),
        Commands::Round(args) => round_cmd::run(args),
    }
}

/// RUST_LOG wins over --verbose
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
