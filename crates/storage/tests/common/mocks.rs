use async_trait::async_trait;
use bytes::Bytes;
use catalog_storage::{ObjectStore, StorageError, StorageResult};
use std::sync::Arc;

/// Mock backend that rejects every write and finds nothing on read.
#[allow(dead_code)]
pub struct ReadOnlyBackend;

#[allow(dead_code)]
impl ReadOnlyBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl ObjectStore for ReadOnlyBackend {
    async fn get(&self, _key: &str) -> StorageResult<Bytes> {
        Err(StorageError::NotFound("mock backend".to_string()))
    }

    async fn put(&self, _key: &str, _data: Bytes) -> StorageResult<()> {
        Err(StorageError::InvalidKey(
            "mock backend is read-only".to_string(),
        ))
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Err(StorageError::InvalidKey(
            "mock backend is read-only".to_string(),
        ))
    }

    async fn list(&self, _prefix: &str) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "mock-read-only"
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
