//! Dataset repository trait.

use crate::error::MetadataResult;
use crate::models::DatasetRow;
use async_trait::async_trait;
use catalog_core::DatasetId;

/// Repository for datasets.
#[async_trait]
pub trait DatasetRepo: Send + Sync {
    /// Create a new dataset. Fails with `AlreadyExists` if the id is taken.
    async fn create_dataset(&self, dataset: &DatasetRow) -> MetadataResult<()>;

    /// Get a dataset by its natural id.
    async fn get_dataset(&self, id: &DatasetId) -> MetadataResult<Option<DatasetRow>>;
}
