//! Error definitions for the configuration subsystem.

use thiserror::Error;

/// Errors from loading, persisting, or mutating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted content is not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An administrative update violated a field invariant.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A session lookup fell outside the current pool.
    #[error("session index {index} out of range for pool of {pool_size}")]
    OutOfRange { index: usize, pool_size: usize },
}

/// Per-field update rejections, surfaced verbatim to admin callers.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("API key cannot be empty")]
    EmptyApiKey,

    #[error("address cannot be empty")]
    EmptyAddress,

    #[error("max_chat_history_length must be >= 1")]
    InvalidHistoryLength,

    #[error("default_model cannot be empty")]
    EmptyDefaultModel,

    #[error("prompt_for_file cannot be empty")]
    EmptyPromptForFile,

    #[error("sessions cannot be empty")]
    EmptySessions,
}
