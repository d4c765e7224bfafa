//! Configuration types for laying out a round
//!
//! Level 4 - Utilities and configuration

use fencepool_core::{Configuration, OrderingStyle, SequencerConfig};
use serde::{Deserialize, Serialize};

use crate::fencer::Fencer;

/// How ranked fencers are dealt into pools
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadMode {
    /// Fill pool 1, then pool 2, and so on
    Sequential,
    /// Deal in snake order so every pool gets a fair share of the seeds
    Serpentine,
}

impl Default for SpreadMode {
    fn default() -> Self {
        SpreadMode::Sequential
    }
}

/// Fencer attribute the bout order keeps apart
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affinity {
    /// Ignore affinities
    None,
    /// Keep clubmates apart
    #[default]
    Club,
    /// Keep compatriots apart
    Nation,
}

impl Affinity {
    /// Grouping key of a fencer under this criterion
    pub fn key(&self, fencer: &Fencer) -> Option<String> {
        match self {
            Affinity::None => None,
            Affinity::Club => fencer.club.clone(),
            Affinity::Nation => fencer.nation.clone(),
        }
    }
}

/// Round layout configuration
#[derive(Clone, Debug)]
pub struct RoundConfig {
    /// How fencers are dealt into pools
    pub spread: SpreadMode,
    /// Attribute the bout order keeps apart
    pub affinity: Affinity,
    /// Explicit configuration (None = the solver's best)
    pub configuration: Option<Configuration>,
    /// Match ordering settings shared by every pool
    pub sequencer: SequencerConfig,
    /// Whether to order the pools in parallel
    pub parallel: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            spread: SpreadMode::Sequential,
            affinity: Affinity::Club,
            configuration: None,
            sequencer: SequencerConfig::default(),
            parallel: true,
        }
    }
}

impl RoundConfig {
    /// Set the spreading mode
    pub fn with_spread(mut self, spread: SpreadMode) -> Self {
        self.spread = spread;
        self
    }

    /// Set the affinity criterion
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// Force a configuration instead of the solver's pick
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    /// Use kendo reference orders
    pub fn with_style(mut self, style: OrderingStyle) -> Self {
        self.sequencer = self.sequencer.with_style(style);
        self
    }

    /// Order pools on the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
