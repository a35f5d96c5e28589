//! Request shapes for the artifact operations.

use crate::artifact::Artifact;
use crate::dataset::DatasetId;

/// Selects the artifact a get request resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactQuery {
    /// Direct lookup by artifact id.
    ById(String),
    /// Indirect lookup through the artifact a tag currently points at.
    ByTag(String),
}

impl ArtifactQuery {
    /// Build a selector from two optional wire fields.
    ///
    /// Returns `Ok(None)` when neither is set and `Err` with both values when
    /// both are set, leaving the decision of how to report it to the caller.
    pub fn from_fields(
        artifact_id: Option<String>,
        tag_name: Option<String>,
    ) -> Result<Option<Self>, (String, String)> {
        match (artifact_id, tag_name) {
            (Some(id), None) => Ok(Some(Self::ById(id))),
            (None, Some(tag)) => Ok(Some(Self::ByTag(tag))),
            (None, None) => Ok(None),
            (Some(id), Some(tag)) => Err((id, tag)),
        }
    }
}

/// Create an artifact together with its payload parts.
///
/// `artifact.metadata` may be `None`; it is stored as empty metadata.
#[derive(Clone, Debug)]
pub struct CreateArtifactRequest {
    pub artifact: Artifact,
}

/// Acknowledgment of a successful create. Carries no derived fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateArtifactResponse;

/// Fetch an artifact by id or by tag.
///
/// Exactly one selector must be set; validation turns the pair into an
/// [`ArtifactQuery`].
#[derive(Clone, Debug, Default)]
pub struct GetArtifactRequest {
    pub dataset: DatasetId,
    pub artifact_id: Option<String>,
    pub tag_name: Option<String>,
}

impl GetArtifactRequest {
    pub fn by_id(dataset: DatasetId, artifact_id: impl Into<String>) -> Self {
        Self {
            dataset,
            artifact_id: Some(artifact_id.into()),
            tag_name: None,
        }
    }

    pub fn by_tag(dataset: DatasetId, tag_name: impl Into<String>) -> Self {
        Self {
            dataset,
            artifact_id: None,
            tag_name: Some(tag_name.into()),
        }
    }
}

/// A fully rehydrated artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GetArtifactResponse {
    pub artifact: Artifact,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields() {
        assert_eq!(
            ArtifactQuery::from_fields(Some("a1".into()), None),
            Ok(Some(ArtifactQuery::ById("a1".into())))
        );
        assert_eq!(
            ArtifactQuery::from_fields(None, Some("latest".into())),
            Ok(Some(ArtifactQuery::ByTag("latest".into())))
        );
        assert_eq!(ArtifactQuery::from_fields(None, None), Ok(None));
        assert!(ArtifactQuery::from_fields(Some("a1".into()), Some("latest".into())).is_err());
    }
}
