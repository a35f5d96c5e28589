//! Database models mapping to the metadata schema.

use catalog_core::{ArtifactDataRef, DatasetId};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// Datasets
// =============================================================================

/// Dataset record. The surrogate `dataset_uuid` keys child rows; the four
/// natural components are unique together.
#[derive(Debug, Clone, FromRow)]
pub struct DatasetRow {
    pub dataset_uuid: Uuid,
    pub project: String,
    pub domain: String,
    pub name: String,
    pub version: String,
    pub serialized_metadata: Option<Vec<u8>>,
    pub created_at: OffsetDateTime,
}

impl DatasetRow {
    /// The natural identifier of this dataset.
    pub fn dataset_id(&self) -> DatasetId {
        DatasetId::new(&self.project, &self.domain, &self.name, &self.version)
    }
}

// =============================================================================
// Artifacts
// =============================================================================

/// Artifact record. Payload bytes are never stored here.
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactRow {
    pub dataset_uuid: Uuid,
    pub artifact_id: String,
    /// Encoded metadata blob. Nullable in the schema so a record written
    /// outside the normal path can be detected on read.
    pub serialized_metadata: Option<Vec<u8>>,
    pub created_at: OffsetDateTime,
}

/// Location reference of one payload part.
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactDataRow {
    pub dataset_uuid: Uuid,
    pub artifact_id: String,
    /// Zero-based position in the order the parts were supplied.
    pub position: i32,
    pub name: String,
    pub location: String,
}

impl ArtifactDataRow {
    pub fn to_data_ref(&self) -> ArtifactDataRef {
        ArtifactDataRef {
            name: self.name.clone(),
            location: self.location.clone(),
        }
    }
}

/// An artifact row joined with its dataset and payload part rows.
#[derive(Debug, Clone)]
pub struct ArtifactRecord {
    pub dataset: DatasetId,
    pub artifact: ArtifactRow,
    /// Ordered by `position`.
    pub data: Vec<ArtifactDataRow>,
}

// =============================================================================
// Tags
// =============================================================================

/// Tag record pointing at an artifact in the same dataset.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub dataset_uuid: Uuid,
    pub tag_name: String,
    pub artifact_id: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A tag together with the artifact it resolves to at lookup time.
#[derive(Debug, Clone)]
pub struct TagRecord {
    pub tag: TagRow,
    pub artifact: ArtifactRecord,
}
