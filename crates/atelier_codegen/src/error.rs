//! Error types for code generation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

/// Errors that abort a render or sync.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("Output path is not a directory: {0}")]
    InvalidOutput(PathBuf),

    #[error("Failed to {action} {path}: {source}")]
    File {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Model error: {0}")]
    Model(#[from] atelier_model::ModelError),
}

impl CodegenError {
    /// Wrap an IO error with the path it concerns.
    pub fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}
