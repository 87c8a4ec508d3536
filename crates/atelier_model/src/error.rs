//! Error types for the model crate.

use thiserror::Error;

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building or mutating a component tree.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Duplicate component id: {0}")]
    DuplicateId(String),

    #[error("Component not found: {0}")]
    NodeNotFound(String),

    #[error("Parent {parent} of component {node} does not exist")]
    UnknownParent { node: String, parent: String },

    #[error("Linking {node} under {parent} would create a cycle")]
    Cycle { node: String, parent: String },

    #[error("Invalid project document: {0}")]
    InvalidDocument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
