//! Artifact create and get.
//!
//! Payload bytes travel base64 encoded inside the JSON bodies. Both handlers
//! delegate to the [`ArtifactManager`](crate::manager::ArtifactManager).

use crate::error::ApiResult;
use crate::handlers::read_json;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use bytes::Bytes;
use catalog_core::{
    Artifact, ArtifactData, CreateArtifactRequest, DatasetId, GetArtifactRequest, Metadata,
};
use serde::{Deserialize, Serialize};

/// One payload part on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDataBody {
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub value: Bytes,
}

impl From<ArtifactDataBody> for ArtifactData {
    fn from(body: ArtifactDataBody) -> Self {
        ArtifactData {
            name: body.name,
            value: body.value,
        }
    }
}

impl From<ArtifactData> for ArtifactDataBody {
    fn from(data: ArtifactData) -> Self {
        ArtifactDataBody {
            name: data.name,
            value: data.value,
        }
    }
}

/// Request body for creating an artifact.
#[derive(Debug, Deserialize)]
pub struct CreateArtifactBody {
    pub dataset: DatasetId,
    pub artifact_id: String,
    #[serde(default)]
    pub data: Vec<ArtifactDataBody>,
    /// Absent or `null` is stored as empty metadata.
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

/// Response for a created artifact. Intentionally empty.
#[derive(Debug, Serialize)]
pub struct CreateArtifactBodyResponse {}

/// Query parameters for fetching an artifact.
#[derive(Debug, Default, Deserialize)]
pub struct GetArtifactParams {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub artifact_id: Option<String>,
    pub tag_name: Option<String>,
}

impl From<GetArtifactParams> for GetArtifactRequest {
    fn from(params: GetArtifactParams) -> Self {
        GetArtifactRequest {
            dataset: DatasetId::new(params.project, params.domain, params.name, params.version),
            artifact_id: params.artifact_id,
            tag_name: params.tag_name,
        }
    }
}

/// A rehydrated artifact on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactBody {
    pub id: String,
    pub dataset: DatasetId,
    pub metadata: Metadata,
    pub data: Vec<ArtifactDataBody>,
}

impl From<Artifact> for ArtifactBody {
    fn from(artifact: Artifact) -> Self {
        ArtifactBody {
            id: artifact.id,
            dataset: artifact.dataset,
            metadata: artifact.metadata.unwrap_or_default(),
            data: artifact.data.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response for a fetched artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct GetArtifactBodyResponse {
    pub artifact: ArtifactBody,
}

/// POST /v1/artifacts - Create an artifact and offload its payload parts.
pub async fn create_artifact(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<CreateArtifactBodyResponse>)> {
    let body: CreateArtifactBody = read_json(req, state.config.server.max_body_bytes).await?;

    let request = CreateArtifactRequest {
        artifact: Artifact {
            id: body.artifact_id,
            dataset: body.dataset,
            metadata: body.metadata,
            data: body.data.into_iter().map(Into::into).collect(),
        },
    };
    state.artifacts.create_artifact(&request).await?;

    Ok((StatusCode::CREATED, Json(CreateArtifactBodyResponse {})))
}

/// GET /v1/artifacts - Fetch an artifact by id or tag.
pub async fn get_artifact(
    State(state): State<AppState>,
    Query(params): Query<GetArtifactParams>,
) -> ApiResult<Json<GetArtifactBodyResponse>> {
    let request = GetArtifactRequest::from(params);
    let response = state.artifacts.get_artifact(&request).await?;

    Ok(Json(GetArtifactBodyResponse {
        artifact: response.artifact.into(),
    }))
}

/// Serde adapter encoding payload bytes as standard base64.
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map(Bytes::from)
            .map_err(serde::de::Error::custom)
    }
}
