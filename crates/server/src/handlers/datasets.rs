//! Dataset registration.

use crate::error::{ApiError, ApiResult};
use crate::handlers::read_json;
use crate::state::AppState;
use crate::validators::validate_dataset_id;
use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use catalog_core::{Dataset, DatasetId, Metadata};
use catalog_metadata::MetadataError;
use catalog_metadata::transform;
use serde::{Deserialize, Serialize};

/// Maximum request body size for dataset registration (1 MiB).
const MAX_DATASET_BODY_SIZE: usize = 1024 * 1024;

/// Request body for creating a dataset.
#[derive(Debug, Deserialize)]
pub struct CreateDatasetBody {
    pub dataset: DatasetId,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Response for a created dataset.
#[derive(Debug, Serialize)]
pub struct CreateDatasetResponse {
    pub dataset: DatasetId,
}

/// POST /v1/datasets - Register a dataset.
pub async fn create_dataset(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<CreateDatasetResponse>)> {
    let body: CreateDatasetBody = read_json(req, MAX_DATASET_BODY_SIZE).await?;
    validate_dataset_id(&body.dataset)?;

    let dataset = Dataset {
        id: body.dataset,
        metadata: body.metadata,
    };
    let row = transform::to_dataset_row(&dataset)?;

    match state.metadata.create_dataset(&row).await {
        Ok(()) => {}
        Err(MetadataError::AlreadyExists(_)) => {
            return Err(ApiError::Conflict(format!(
                "dataset {} already exists",
                dataset.id
            )));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(dataset = %dataset.id, "dataset created");
    Ok((
        StatusCode::CREATED,
        Json(CreateDatasetResponse {
            dataset: dataset.id,
        }),
    ))
}
