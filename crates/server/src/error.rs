//! Error types: orchestration failures and their HTTP mapping.

use crate::validators::ValidationError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_metadata::MetadataError;
use catalog_storage::StorageError;
use serde::Serialize;

/// Coarse classification of a [`CatalogError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad request shape; nothing was written.
    Validation,
    /// Referenced dataset, artifact or tag is absent.
    NotFound,
    /// A payload part or the artifact record could not be written.
    StorageWrite,
    /// A payload part could not be read back.
    StorageRead,
    /// Stored metadata could not be decoded.
    Decode,
    /// Stored data violates an integrity invariant.
    InvalidState,
    /// Repository lookup failed for a reason other than absence.
    Internal,
}

/// Failure of an artifact manager operation.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("failed to store artifact data {part}: {source}")]
    DataWrite {
        part: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to persist artifact: {0}")]
    MetadataWrite(#[source] MetadataError),

    #[error("failed to read artifact data {part}: {source}")]
    DataRead {
        part: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to build artifact record: {0}")]
    Transform(#[source] catalog_core::Error),

    #[error("failed to decode artifact: {0}")]
    Decode(#[source] catalog_core::Error),

    #[error("artifact {0} does not have artifact data associated")]
    MissingArtifactData(String),

    #[error("metadata lookup failed: {0}")]
    Lookup(#[source] MetadataError),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DataWrite { .. } | Self::MetadataWrite(_) => ErrorKind::StorageWrite,
            Self::DataRead { .. } => ErrorKind::StorageRead,
            Self::Decode(catalog_core::Error::MetadataAbsent) => ErrorKind::InvalidState,
            Self::Decode(_) => ErrorKind::Decode,
            Self::MissingArtifactData(_) => ErrorKind::InvalidState,
            Self::Transform(_) | Self::Lookup(_) => ErrorKind::Internal,
        }
    }

    /// Whether the artifact record was rejected as a duplicate.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::MetadataWrite(e) if e.is_already_exists())
    }
}

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("core error: {0}")]
    Core(#[from] catalog_core::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Catalog(CatalogError::Validation(err))
    }
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Conflict(_) => "conflict",
            Self::Catalog(e) if e.is_already_exists() => "already_exists",
            Self::Catalog(e) => match e.kind() {
                ErrorKind::Validation => "invalid_argument",
                ErrorKind::NotFound => "not_found",
                ErrorKind::StorageWrite => "storage_write_error",
                ErrorKind::StorageRead => "storage_read_error",
                ErrorKind::Decode => "decode_error",
                ErrorKind::InvalidState => "invalid_state",
                ErrorKind::Internal => "internal_error",
            },
            Self::Storage(_) => "storage_error",
            Self::Metadata(MetadataError::AlreadyExists(_)) => "already_exists",
            Self::Metadata(_) => "metadata_error",
            Self::Core(_) => "core_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Catalog(e) if e.is_already_exists() => StatusCode::CONFLICT,
            Self::Catalog(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Storage(e) => match e {
                StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Metadata(e) => match e {
                MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                MetadataError::AlreadyExists(_) => StatusCode::CONFLICT,
                MetadataError::Constraint(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Core(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
