//! Round layout errors

use fencepool_core::Configuration;

/// Error types for laying out a round
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("Roster is empty")]
    EmptyRoster,

    #[error("No pool configuration for {fencers} fencers")]
    NoConfiguration { fencers: u32 },

    #[error("Configuration '{configuration}' does not place {fencers} fencers")]
    ConfigurationMismatch {
        configuration: Configuration,
        fencers: u32,
    },
}
