//! Payload offload: artifact parts live in the object store, the metadata
//! store only keeps their location.

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use catalog_core::{ArtifactData, ArtifactDataRef, ArtifactKey};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

/// Put and get of single payload parts.
#[async_trait]
pub trait ArtifactDataStore: Send + Sync {
    /// Durably write one part for the given artifact and return its
    /// location reference.
    async fn put_data(&self, key: &ArtifactKey, data: &ArtifactData)
    -> StorageResult<ArtifactDataRef>;

    /// Read back the bytes of a stored part.
    async fn get_data(&self, data_ref: &ArtifactDataRef) -> StorageResult<Bytes>;
}

/// [`ArtifactDataStore`] over any [`ObjectStore`].
///
/// Parts are written to
/// `{prefix}/{project}/{domain}/{name}/{version}/{artifact_id}/{write_id}/{part_name}`
/// and that key is the location. `write_id` is fresh for every put, so a
/// losing duplicate create can never replace the bytes of a committed
/// artifact; it leaves its own objects behind instead.
pub struct OffloadedArtifactDataStore {
    store: Arc<dyn ObjectStore>,
    prefix: String,
}

impl OffloadedArtifactDataStore {
    pub fn new(store: Arc<dyn ObjectStore>, prefix: impl Into<String>) -> StorageResult<Self> {
        let prefix = prefix.into().trim_matches('/').to_string();
        if prefix.is_empty() {
            return Err(StorageError::Config(
                "artifact data prefix must not be empty".to_string(),
            ));
        }
        for segment in prefix.split('/') {
            check_segment("prefix", segment).map_err(|_| {
                StorageError::Config(format!("invalid artifact data prefix: {prefix}"))
            })?;
        }
        Ok(Self { store, prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A new object key for a part of the given artifact.
    pub fn location_for(&self, key: &ArtifactKey, part_name: &str) -> StorageResult<String> {
        let write_id = Uuid::new_v4().simple().to_string();
        let dataset = &key.dataset;
        let segments = [
            ("project", dataset.project.as_str()),
            ("domain", dataset.domain.as_str()),
            ("name", dataset.name.as_str()),
            ("version", dataset.version.as_str()),
            ("artifact_id", key.artifact_id.as_str()),
            ("write id", write_id.as_str()),
            ("part name", part_name),
        ];

        let mut location = self.prefix.clone();
        for (what, segment) in segments {
            check_segment(what, segment)?;
            location.push('/');
            location.push_str(segment);
        }
        Ok(location)
    }
}

/// A location component must be a single, non-special path segment.
fn check_segment(what: &str, segment: &str) -> StorageResult<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains('/')
        || segment.contains('\\')
    {
        return Err(StorageError::InvalidKey(format!(
            "{what} cannot be used as a storage key segment: {segment:?}"
        )));
    }
    Ok(())
}

#[async_trait]
impl ArtifactDataStore for OffloadedArtifactDataStore {
    #[instrument(skip(self, data), fields(part = %data.name, size = data.value.len()))]
    async fn put_data(
        &self,
        key: &ArtifactKey,
        data: &ArtifactData,
    ) -> StorageResult<ArtifactDataRef> {
        let location = self.location_for(key, &data.name)?;
        self.store.put(&location, data.value.clone()).await?;
        tracing::debug!(%location, "offloaded payload part");
        Ok(ArtifactDataRef {
            name: data.name.clone(),
            location,
        })
    }

    #[instrument(skip(self), fields(part = %data_ref.name))]
    async fn get_data(&self, data_ref: &ArtifactDataRef) -> StorageResult<Bytes> {
        let inside_prefix = data_ref
            .location
            .strip_prefix(&self.prefix)
            .is_some_and(|rest| rest.starts_with('/'));
        if !inside_prefix {
            return Err(StorageError::InvalidKey(format!(
                "location outside artifact data prefix: {}",
                data_ref.location
            )));
        }
        self.store.get(&data_ref.location).await
    }
}
