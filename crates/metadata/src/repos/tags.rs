//! Tag repository trait.

use crate::error::MetadataResult;
use crate::models::TagRecord;
use async_trait::async_trait;
use catalog_core::DatasetId;

/// Repository for tags.
#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Point `tag_name` at `artifact_id`, creating the tag or moving it.
    /// Fails with `NotFound` if the artifact does not exist in the dataset.
    async fn upsert_tag(
        &self,
        dataset: &DatasetId,
        tag_name: &str,
        artifact_id: &str,
    ) -> MetadataResult<()>;

    /// Get a tag and the artifact it currently points at.
    async fn get_tag(&self, dataset: &DatasetId, tag_name: &str)
    -> MetadataResult<Option<TagRecord>>;
}
