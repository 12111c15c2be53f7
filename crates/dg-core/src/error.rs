//! Generation error types

use thiserror::Error;

use crate::dungeon::Structure;

/// Floor parameters that break a generator precondition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("{field} is a percentage but was {value}")]
    PercentageOutOfRange { field: &'static str, value: u32 },

    #[error("{field} must not exceed {max}, got {value}")]
    DensityTooHigh {
        field: &'static str,
        value: u32,
        max: u32,
    },

    #[error("floor_connectivity must be at least 1 for the {structure} structure")]
    NoConnectivity { structure: Structure },

    #[error("max_attempts must be at least 1")]
    NoAttempts,
}

/// Errors surfaced by `FloorBuilder::build`
///
/// Layout failures are retried internally and never appear here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid floor parameters: {0}")]
    InvalidParams(#[from] ParamsError),

    #[error("could not generate a connected floor in {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("no tile left to place the {what}")]
    NoSpawnCandidate { what: &'static str },
}
