//! Error types for the metrics component

use thiserror::Error;

/// Errors that can occur in metrics component operations
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Sampling is already running
    #[error("Sampler is already running")]
    SamplerAlreadyRunning,

    /// Sampling is not running
    #[error("Sampler is not running")]
    SamplerNotRunning,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Other errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type for metrics component operations
pub type Result<T> = std::result::Result<T, MetricsError>;
