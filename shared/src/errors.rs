//! Error types for the step tracker

use thiserror::Error;

/// Tracker error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Collaborator failure: {0}")]
    CollaboratorFailure(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid tracker config: {0}")]
    InvalidConfig(String),
}

impl TrackerError {
    /// Short machine-readable kind, used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::PermissionDenied(_) => "permission_denied",
            TrackerError::CollaboratorFailure(_) => "collaborator_failure",
            TrackerError::InvalidSeed(_) => "invalid_seed",
            TrackerError::InvalidConfig(_) => "invalid_config",
        }
    }
}
