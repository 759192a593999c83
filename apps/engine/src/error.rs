use thiserror::Error;

use crate::errors::domain::DomainError;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Unsupported behavior mode: {mode}")]
    UnknownMode { mode: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {detail}")]
    Internal { detail: String },
}

impl EngineError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Domain(DomainError::InvalidPlayerCount { .. }) => "INVALID_PLAYER_COUNT",
            EngineError::Domain(DomainError::Configuration(_)) => "CONFIGURATION_ERROR",
            EngineError::Domain(DomainError::NoAliveVoters) => "NO_ALIVE_VOTERS",
            EngineError::Domain(DomainError::PhaseMismatch { .. }) => "PHASE_MISMATCH",
            EngineError::Domain(DomainError::GameFinished) => "GAME_FINISHED",
            EngineError::Domain(DomainError::UnknownPlayer(_)) => "UNKNOWN_PLAYER",
            EngineError::Domain(DomainError::Validation(_)) => "VALIDATION_ERROR",
            EngineError::Config { .. } => "CONFIGURATION_ERROR",
            EngineError::UnknownMode { .. } => "UNKNOWN_MODE",
            EngineError::Serialization(_) => "SERIALIZATION_ERROR",
            EngineError::Io(_) => "IO_ERROR",
            EngineError::Internal { .. } => "INTERNAL",
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn unknown_mode(mode: impl Into<String>) -> Self {
        Self::UnknownMode { mode: mode.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}

impl From<serde_yaml::Error> for EngineError {
    fn from(e: serde_yaml::Error) -> Self {
        EngineError::config(format!("yaml error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_share_a_code() {
        let from_domain: EngineError = DomainError::configuration("empty vocabulary").into();
        let from_loader = EngineError::config("bad file");
        assert_eq!(from_domain.code(), from_loader.code());
    }

    #[test]
    fn unknown_mode_mentions_mode() {
        let err = EngineError::unknown_mode("chaos");
        assert_eq!(err.code(), "UNKNOWN_MODE");
        assert!(err.to_string().contains("chaos"));
    }
}
