//! Test fixtures for generating test data.

use bytes::Bytes;
use catalog_core::{Artifact, ArtifactData, Dataset, DatasetId, Metadata};
use catalog_metadata::MetadataStore;
use catalog_metadata::transform;

/// Generate deterministic test data based on a seed.
#[allow(dead_code)]
pub fn seeded_bytes(seed: u64, len: usize) -> Bytes {
    let mut data = vec![0u8; len];
    let mut state = seed;

    for chunk in data.chunks_mut(8) {
        // Simple LCG for deterministic data
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let bytes = state.to_le_bytes();
        for (i, byte) in chunk.iter_mut().enumerate() {
            *byte = bytes[i % 8];
        }
    }

    Bytes::from(data)
}

/// The dataset most tests create artifacts in.
#[allow(dead_code)]
pub fn test_dataset_id() -> DatasetId {
    DatasetId::new("flyte", "development", "weights", "v1")
}

/// Build an artifact with the given named parts.
#[allow(dead_code)]
pub fn test_artifact(dataset: &DatasetId, id: &str, parts: &[(&str, Bytes)]) -> Artifact {
    Artifact {
        id: id.to_string(),
        dataset: dataset.clone(),
        metadata: Some(Metadata::from_pairs([("owner", "tests")])),
        data: parts
            .iter()
            .map(|(name, value)| ArtifactData::new(*name, value.clone()))
            .collect(),
    }
}

/// Register a dataset directly in the metadata store.
#[allow(dead_code)]
pub async fn register_dataset(metadata: &dyn MetadataStore, id: &DatasetId) {
    let row = transform::to_dataset_row(&Dataset {
        id: id.clone(),
        metadata: Metadata::default(),
    })
    .expect("Failed to build dataset row");
    metadata
        .create_dataset(&row)
        .await
        .expect("Failed to create dataset");
}
