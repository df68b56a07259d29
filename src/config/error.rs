//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Step timeout must be between 1 and 300 seconds")]
    InvalidStepTimeout,

    #[error("max_conversations must be at least 1")]
    InvalidMaxConversations,

    #[error("Remote step provider URL must use http or https")]
    InvalidRemoteUrl,

    #[error("Idle TTL must be at least 1 second")]
    InvalidIdleTtl,

    #[error("Request timeout ({request_secs}s) must exceed the step timeout ({step_secs}s)")]
    TimeoutOrdering { request_secs: u64, step_secs: u64 },
}
