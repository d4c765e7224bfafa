//! FENCEPOOL Core - Pool partitioning and match ordering
//!
//! This crate provides the scheduling engine of a fencing pool round:
//! - Pool configurations for a field of N fencers
//! - Affinity groups (clubs, teams) interned per run
//! - Opponent graph driving the greedy order
//! - Reference match orders for ungrouped pools
//! - The pair sequencer tying them together

pub mod affinity;
pub mod configuration;
pub mod opponent;
pub mod ordering;
pub mod pair;
pub mod sequencer;

// Re-exports for convenient access
pub use affinity::{AffinityBucket, AffinityIndex, GroupId};
pub use configuration::{solve, Configuration, ConfigurationSet, FALLBACK_POOL_SIZE, PREFERRED_SIZE_LIMIT};
pub use opponent::{Competitor, OpponentGraph, SlotId, UNSCORED};
pub use ordering::{pair_count, reference_order, OrderingStyle, MAX_POOL_SIZE};
pub use pair::{Pair, MIN_REST};
pub use sequencer::{BuildPath, PairSequencer, ScheduleOutcome, SequencerConfig, SequencerState};
