//! Error types for cascade construction, loading, and selection.

use thiserror::Error;

/// Errors surfaced by the cascade and its loaders.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// A selection or lookup named a field no registered node filters on.
    #[error("unknown filter node '{0}'")]
    UnknownNode(String),

    /// Two nodes were registered for the same field.
    #[error("duplicate filter node '{0}'")]
    DuplicateNode(String),

    /// Parent links form a cycle; the topology must be a forest/DAG.
    #[error("parent dependency cycle involving '{0}'")]
    DependencyCycle(String),

    /// Record or topology document failed to parse.
    #[error("invalid document: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// A node shorthand like `City:Region:multi` failed to parse.
    #[error("invalid node spec '{spec}': {reason}")]
    InvalidNodeSpec { spec: String, reason: String },
}

/// Result type for cascade operations.
pub type CascadeResult<T> = Result<T, CascadeError>;
