//! Error types for the interpretation crate.

use thiserror::Error;

/// Result type alias for generative backend operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Errors raised by text-generation backends and configuration loading.
///
/// Interpretation itself never fails: these errors are logged and turned
/// into a pattern-matching fallback by the callers.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("No generative backend configured")]
    NotConfigured,

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request to {model} timed out after {seconds}s")]
    Timeout { model: String, seconds: u64 },

    #[error("Backend returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
