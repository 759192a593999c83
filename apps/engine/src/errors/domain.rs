//! Domain-level error type used by the pure rules layer.
//!
//! This error type knows nothing about configuration files, serialization or
//! behavior dispatch. Orchestrator entry points return
//! `Result<T, crate::error::EngineError>` and convert from `DomainError`
//! through the provided `From` implementation.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::domain::state::Phase;

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Fewer players than the game can be played with.
    InvalidPlayerCount { count: usize, min: usize },
    /// Bad vocabulary or roster handed to setup.
    Configuration(String),
    /// Round resolution attempted with nobody alive.
    NoAliveVoters,
    /// Operation requires a different phase.
    PhaseMismatch { expected: Phase, actual: Phase },
    /// State is in `result` and no longer accepts writes.
    GameFinished,
    /// Player id is not part of the roster.
    UnknownPlayer(String),
    /// Any other business rule violation.
    Validation(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::InvalidPlayerCount { count, min } => {
                write!(f, "invalid player count: {count} (at least {min} required)")
            }
            DomainError::Configuration(d) => write!(f, "configuration error: {d}"),
            DomainError::NoAliveVoters => write!(f, "no alive voters"),
            DomainError::PhaseMismatch { expected, actual } => {
                write!(f, "phase mismatch: expected {expected}, got {actual}")
            }
            DomainError::GameFinished => write!(f, "game already finished"),
            DomainError::UnknownPlayer(id) => write!(f, "unknown player: {id}"),
            DomainError::Validation(d) => write!(f, "validation error: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration(detail.into())
    }
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation(detail.into())
    }
    pub fn phase_mismatch(expected: Phase, actual: Phase) -> Self {
        Self::PhaseMismatch { expected, actual }
    }
}
