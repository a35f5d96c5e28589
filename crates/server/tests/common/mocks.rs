//! Failure-injecting and recording test doubles.

use async_trait::async_trait;
use bytes::Bytes;
use catalog_server::{ArtifactEvent, ArtifactReporter, Operation};
use catalog_storage::{ObjectStore, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Object store that fails the n-th `put` (1-based) and delegates
/// everything else to an inner store.
#[allow(dead_code)]
pub struct FailingObjectStore {
    inner: Arc<dyn ObjectStore>,
    fail_on_put: usize,
    puts: AtomicUsize,
}

#[allow(dead_code)]
impl FailingObjectStore {
    pub fn new(inner: Arc<dyn ObjectStore>, fail_on_put: usize) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail_on_put,
            puts: AtomicUsize::new(0),
        })
    }

    /// Number of `put` calls seen, including the failed one.
    pub fn put_calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for FailingObjectStore {
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let call = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on_put {
            return Err(StorageError::Io(std::io::Error::other(format!(
                "injected failure writing {key}"
            ))));
        }
        self.inner.put(key, data).await
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.inner.delete(key).await
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.inner.list(prefix).await
    }

    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.inner.health_check().await
    }
}

/// Reporter that keeps every event and timed operation in memory.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ArtifactEvent>>,
    operations: Mutex<Vec<Operation>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<ArtifactEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, event: ArtifactEvent) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == event)
            .count()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.operations.lock().unwrap().clone()
    }
}

impl ArtifactReporter for RecordingReporter {
    fn record(&self, event: ArtifactEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn observe_duration(&self, operation: Operation, _elapsed: Duration) {
        self.operations.lock().unwrap().push(operation);
    }
}
