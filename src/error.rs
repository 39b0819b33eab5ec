//! Error types for collection mutations and import parsing

use thiserror::Error;

/// Validation failure for malformed import input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The import text is not valid JSON
    #[error("Invalid JSON format: {0}")]
    Json(String),
    /// Valid JSON, but not a collection envelope
    #[error("Invalid collection file format: {0}")]
    CollectionEnvelope(String),
    /// Valid JSON, but missing `openapi`, `info` or `paths`
    #[error("Invalid OpenAPI file format: {0}")]
    OpenApiEnvelope(String),
}

/// Errors reported by tree store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Structural mutation attempted against a request
    #[error("Node '{0}' is not a folder")]
    NotAFolder(String),
    /// Mutation referenced a nonexistent id
    #[error("Node '{0}' not found")]
    NotFound(String),
}

pub type CollectionResult<T> = Result<T, CollectionError>;
