//! Runtime error types

use dryrun_core::DryRunError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("{0}")]
    InputValidation(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(String),

    #[error("Remote call timed out after {0}s")]
    Timeout(u64),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Status line shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            RuntimeError::InputValidation(msg) => msg.clone(),
            RuntimeError::Timeout(secs) => {
                format!("The analysis timed out after {secs}s. Please try again.")
            }
            RuntimeError::Cancelled => "Analysis cancelled.".to_string(),
            other => format!("An error occurred: {other}"),
        }
    }
}

impl From<DryRunError> for RuntimeError {
    fn from(err: DryRunError) -> Self {
        match err {
            DryRunError::InputValidation(_) => RuntimeError::InputValidation(err.to_string()),
            DryRunError::Io(e) => RuntimeError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
