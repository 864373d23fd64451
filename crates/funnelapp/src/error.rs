use crate::model::FilterableField;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunnelError {
    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("No free filter slot for field {0}: all three priorities are occupied")]
    CapacityExceeded(FilterableField),

    #[error("Inconsistent slot state: {0}")]
    InconsistentSlotState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl FunnelError {
    /// Invariant breaches indicate a bug in the engine, not bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FunnelError::CapacityExceeded(_) | FunnelError::InconsistentSlotState(_)
        )
    }
}

impl From<confique::Error> for FunnelError {
    fn from(err: confique::Error) -> Self {
        FunnelError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FunnelError>;
