//! FENCEPOOL Round - Laying out a pool round
//!
//! This crate provides round-level orchestration:
//! - Choosing the pool configuration for the field
//! - Spreading fencers into pools (sequential or serpentine)
//! - Exchanging fencers so no pool holds too many of one club or nation
//! - Ordering the bouts of every pool by affinity
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: plan_round (orchestration)
//! - Level 2: choose_configuration, spread, schedule_pool (phases)
//! - Level 3: sequential and serpentine dealing, group balancing (steps)
//! - Level 4: configuration and error types

mod config;
mod error;
mod fencer;
mod round;
mod spread;
mod swap;

pub use config::{Affinity, RoundConfig, SpreadMode};
pub use error::RoundError;
pub use fencer::Fencer;
pub use round::{plan_round, Bout, PoolPlan, RoundPlan};
pub use spread::{spread, Spread};
pub use swap::{balance_pools, overpopulation, Balance};
