//! Error types for flowchart operations.

use thiserror::Error;

/// Result type for flowchart operations.
pub type FlowResult<T> = Result<T, FlowError>;

/// Errors that can occur in flowchart operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Node not found in the store.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Two nodes share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// Position or size carried a NaN or infinite component.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Unknown shape kind name.
    #[error("Unknown shape kind: {0}")]
    UnknownShape(String),

    /// Snapshot serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
