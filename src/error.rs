//! Error types for metadata ingestion.
//!
//! Classification itself never fails: unknown names, missing metadata and
//! malformed input all degrade to fewer or no suggestions. Errors only arise
//! when the host pushes metadata the engine cannot interpret.

use thiserror::Error;

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised while ingesting metadata pushed by the host.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// An attribute type name outside the DSL's schema type set.
    #[error("unknown attribute type `{0}`")]
    UnknownAttributeType(String),

    /// The extension catalog JSON did not match the expected schema.
    #[error("invalid extension catalog: {0}")]
    InvalidCatalog(#[from] serde_json::Error),
}
