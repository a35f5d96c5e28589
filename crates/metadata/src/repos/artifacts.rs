//! Artifact repository trait.

use crate::error::MetadataResult;
use crate::models::{ArtifactDataRow, ArtifactRecord, ArtifactRow};
use async_trait::async_trait;
use catalog_core::DatasetId;

/// Repository for artifact records.
#[async_trait]
pub trait ArtifactRepo: Send + Sync {
    /// Persist an artifact and its payload part references atomically.
    ///
    /// Fails with `AlreadyExists` when the (dataset, artifact id) pair is
    /// taken and with `NotFound` when the dataset row does not exist.
    async fn create_artifact(
        &self,
        artifact: &ArtifactRow,
        data: &[ArtifactDataRow],
    ) -> MetadataResult<()>;

    /// Get an artifact with its payload part references in stored order.
    async fn get_artifact(
        &self,
        dataset: &DatasetId,
        artifact_id: &str,
    ) -> MetadataResult<Option<ArtifactRecord>>;
}
