//! Metadata store abstraction and implementations for the artifact catalog.
//!
//! This crate provides the structured side of the catalog:
//! - Datasets, the namespaces artifacts live in
//! - Artifact records and the location references of their payload parts
//! - Tags resolving a name to an artifact

pub mod error;
pub mod models;
pub mod repos;
pub mod store;
pub mod transform;

pub use error::{MetadataError, MetadataResult};
pub use repos::{ArtifactRepo, DatasetRepo, TagRepo};
pub use store::{MetadataStore, SqliteStore};

use catalog_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a metadata store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite {
            path,
            query_timeout_secs,
        } => {
            let store = SqliteStore::new(path, *query_timeout_secs).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::config::MetadataConfig;

    #[tokio::test]
    async fn test_from_config_sqlite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("metadata.db");
        let config = MetadataConfig::Sqlite {
            path: db_path.clone(),
            query_timeout_secs: None,
        };

        let store = from_config(&config).await.unwrap();
        store.health_check().await.unwrap();
        assert!(db_path.exists());
    }
}
