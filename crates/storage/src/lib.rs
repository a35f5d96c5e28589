//! Object storage abstraction and payload offload for the artifact catalog.
//!
//! This crate provides:
//! - A key/value object store with atomic writes
//! - A local filesystem backend
//! - The payload offload adapter that places artifact parts in the object
//!   store and reads them back by location

pub mod artifact_data;
pub mod backends;
pub mod error;
pub mod traits;

pub use artifact_data::{ArtifactDataStore, OffloadedArtifactDataStore};
pub use backends::filesystem::FilesystemBackend;
pub use error::{StorageError, StorageResult};
pub use traits::ObjectStore;

use catalog_core::config::StorageConfig;
use std::sync::Arc;

/// Create an object store from configuration.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
    }
}
