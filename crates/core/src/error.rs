//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A metadata blob was expected but the stored value is absent.
    ///
    /// Every persisted artifact is written with an encoded blob, so hitting
    /// this means the record was produced outside the normal write path.
    #[error("serialized metadata should never be absent")]
    MetadataAbsent,

    #[error("metadata decode error: {0}")]
    MetadataDecode(String),

    #[error("metadata encode error: {0}")]
    MetadataEncode(String),

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
