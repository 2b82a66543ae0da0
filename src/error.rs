use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Empty choice sequence: {0}")]
    EmptyChoices(String),

    #[error("Length mismatch: {choices} choices for {scenarios} scenarios")]
    LengthMismatch { choices: usize, scenarios: usize },

    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Numeric error: {0}")]
    Numeric(String),

    #[error("Scoring timed out after {0} ms")]
    Timeout(u64),

    #[error("Worker error: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl RiskError {
    pub fn empty_choices_error(msg: impl Into<String>) -> Self {
        Self::EmptyChoices(msg.into())
    }

    pub fn unknown_game_error(msg: impl Into<String>) -> Self {
        Self::UnknownGame(msg.into())
    }

    pub fn invalid_bounds_error(msg: impl Into<String>) -> Self {
        Self::InvalidBounds(msg.into())
    }

    pub fn invalid_request_error(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn numeric_error(msg: impl Into<String>) -> Self {
        Self::Numeric(msg.into())
    }

    pub fn worker_error(msg: impl Into<String>) -> Self {
        Self::Worker(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn repository_error(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }

    /// True for violations of the caller-facing input contract.
    ///
    /// These map to a client-input response; everything else is internal.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyChoices(_)
                | Self::LengthMismatch { .. }
                | Self::UnknownGame(_)
                | Self::InvalidBounds(_)
                | Self::InvalidRequest(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RiskError>;
