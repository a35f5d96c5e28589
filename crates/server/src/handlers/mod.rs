//! HTTP request handlers.

pub mod artifacts;
pub mod datasets;
pub mod health;
pub mod tags;

pub use artifacts::*;
pub use datasets::*;
pub use health::*;
pub use tags::*;

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use serde::de::DeserializeOwned;

/// Read and parse a JSON request body, bounded by `limit` bytes.
pub(crate) async fn read_json<T: DeserializeOwned>(req: Request, limit: usize) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}
