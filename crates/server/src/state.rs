//! Application state shared across handlers.

use crate::manager::ArtifactManager;
use crate::metrics::ArtifactReporter;
use catalog_core::config::AppConfig;
use catalog_metadata::MetadataStore;
use catalog_storage::{ObjectStore, OffloadedArtifactDataStore, StorageResult};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend holding offloaded payload parts.
    pub storage: Arc<dyn ObjectStore>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Artifact create/get orchestration.
    pub artifacts: Arc<ArtifactManager>,
}

impl AppState {
    /// Create the application state, wiring the artifact manager to the
    /// object store under the configured payload prefix.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        reporter: Arc<dyn ArtifactReporter>,
    ) -> StorageResult<Self> {
        let data_store =
            OffloadedArtifactDataStore::new(storage.clone(), config.artifacts.prefix.clone())?;
        let artifacts = ArtifactManager::new(metadata.clone(), Arc::new(data_store), reporter);

        Ok(Self {
            config: Arc::new(config),
            storage,
            metadata,
            artifacts: Arc::new(artifacts),
        })
    }
}
