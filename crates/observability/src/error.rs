use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservabilityError {
    #[error("Failed to initialize observability: {0}")]
    InitFailed(String),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInitialized,

    #[error("Configuration error: {0}")]
    Config(String),
}
