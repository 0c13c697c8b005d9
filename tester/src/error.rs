//! Tester error types
//!
//! Per-step failures are not errors: they are recorded as failure results.
//! These variants cover controller invariant violations and collaborator
//! failures outside a step (storage, configuration).

use thiserror::Error;
use shared::SharedError;

/// Result type for runner operations
pub type TesterResult<T> = Result<T, TesterError>;

#[derive(Error, Debug)]
pub enum TesterError {
    #[error("Scenario has no steps")]
    EmptyScenario,

    #[error("Step index {index} is out of range (scenario has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },

    #[error("Step {number} has not been run yet")]
    StepNotRun { number: usize },

    #[error("Already at the last step ({number})")]
    AtLastStep { number: usize },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("A step is already executing for this session")]
    StepInFlight,

    #[error("Auto-run is in progress")]
    AutoRunInProgress,

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl TesterError {
    pub fn config(message: impl Into<String>) -> Self {
        TesterError::ConfigError { message: message.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        TesterError::StorageError { message: message.into() }
    }

    /// Rejected navigation or run request; the session is unchanged
    pub fn is_rejected_command(&self) -> bool {
        matches!(
            self,
            TesterError::StepOutOfRange { .. }
                | TesterError::StepNotRun { .. }
                | TesterError::AtLastStep { .. }
                | TesterError::AtFirstStep
                | TesterError::StepInFlight
                | TesterError::AutoRunInProgress
        )
    }
}
