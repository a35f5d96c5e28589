//! Request shape validation.
//!
//! Validators run before any side effect and only check structure; existence
//! of the referenced dataset, artifact or tag is resolved later.

use catalog_core::{Artifact, ArtifactQuery, CreateArtifactRequest, DatasetId, GetArtifactRequest};
use std::collections::HashSet;
use thiserror::Error;

/// A request failed shape validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingArgument(field));
    }
    Ok(())
}

/// All four dataset components must be present.
pub fn validate_dataset_id(id: &DatasetId) -> Result<(), ValidationError> {
    require("project", &id.project)?;
    require("domain", &id.domain)?;
    require("name", &id.name)?;
    require("version", &id.version)
}

/// Validate an artifact about to be created.
///
/// An empty payload list passes; reads of such an artifact fail instead.
pub fn validate_artifact(artifact: &Artifact) -> Result<(), ValidationError> {
    validate_dataset_id(&artifact.dataset)?;
    require("artifact_id", &artifact.id)?;

    let mut seen = HashSet::with_capacity(artifact.data.len());
    for part in &artifact.data {
        require("artifact data name", &part.name)?;
        if !seen.insert(part.name.as_str()) {
            return Err(ValidationError::InvalidArgument {
                field: "artifact data name",
                reason: format!("duplicate name {:?}", part.name),
            });
        }
    }
    Ok(())
}

pub fn validate_create_request(request: &CreateArtifactRequest) -> Result<(), ValidationError> {
    validate_artifact(&request.artifact)
}

/// Validate a get request and return its selector.
pub fn validate_get_artifact_request(
    request: &GetArtifactRequest,
) -> Result<ArtifactQuery, ValidationError> {
    validate_dataset_id(&request.dataset)?;
    let query = ArtifactQuery::from_fields(request.artifact_id.clone(), request.tag_name.clone())
        .map_err(|(artifact_id, tag_name)| ValidationError::InvalidArgument {
            field: "artifact_id",
            reason: format!(
                "artifact_id {artifact_id:?} and tag_name {tag_name:?} are mutually exclusive"
            ),
        })?
        .ok_or(ValidationError::MissingArgument("artifact_id or tag_name"))?;
    match &query {
        ArtifactQuery::ById(id) => require("artifact_id", id)?,
        ArtifactQuery::ByTag(tag) => require("tag_name", tag)?,
    }
    Ok(query)
}

/// Validate the target of a tag move.
pub fn validate_tag(
    dataset: &DatasetId,
    tag_name: &str,
    artifact_id: &str,
) -> Result<(), ValidationError> {
    validate_dataset_id(dataset)?;
    require("tag_name", tag_name)?;
    require("artifact_id", artifact_id)
}
