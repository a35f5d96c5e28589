//! Tag assignment.

use crate::error::ApiResult;
use crate::handlers::read_json;
use crate::state::AppState;
use crate::validators::validate_tag;
use axum::Json;
use axum::extract::{Request, State};
use catalog_core::{DatasetId, Tag};
use serde::Deserialize;

/// Maximum request body size for tag updates (64 KiB).
const MAX_TAG_BODY_SIZE: usize = 64 * 1024;

/// Request body for pointing a tag at an artifact.
#[derive(Debug, Deserialize)]
pub struct PutTagBody {
    pub dataset: DatasetId,
    pub tag_name: String,
    pub artifact_id: String,
}

/// PUT /v1/tags - Create a tag or move it to another artifact.
///
/// The artifact must already exist in the same dataset.
pub async fn put_tag(State(state): State<AppState>, req: Request) -> ApiResult<Json<Tag>> {
    let body: PutTagBody = read_json(req, MAX_TAG_BODY_SIZE).await?;
    validate_tag(&body.dataset, &body.tag_name, &body.artifact_id)?;

    state
        .metadata
        .upsert_tag(&body.dataset, &body.tag_name, &body.artifact_id)
        .await?;

    tracing::info!(
        dataset = %body.dataset,
        tag = %body.tag_name,
        artifact_id = %body.artifact_id,
        "tag updated"
    );
    Ok(Json(Tag {
        name: body.tag_name,
        dataset: body.dataset,
        artifact_id: body.artifact_id,
    }))
}
