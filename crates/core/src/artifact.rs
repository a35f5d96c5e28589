//! Artifacts, payload parts and tags.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::DatasetId;
use crate::metadata::Metadata;

/// Identity of an artifact within its dataset.
///
/// This is the context the content store receives when a payload part is
/// offloaded, so locations can be derived from it.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub dataset: DatasetId,
    pub artifact_id: String,
}

impl ArtifactKey {
    pub fn new(dataset: DatasetId, artifact_id: impl Into<String>) -> Self {
        Self {
            dataset,
            artifact_id: artifact_id.into(),
        }
    }
}

impl fmt::Debug for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactKey({self})")
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.dataset, self.artifact_id)
    }
}

/// One named payload part with its raw bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactData {
    pub name: String,
    pub value: Bytes,
}

impl ArtifactData {
    pub fn new(name: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A payload part as recorded in the metadata store.
///
/// Only the location reference is stored; the bytes live in the content
/// store and are meaningful only once written there.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDataRef {
    pub name: String,
    pub location: String,
}

/// An artifact with its metadata and payload parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub id: String,
    pub dataset: DatasetId,
    /// Absent only on input; artifacts read back always carry metadata.
    pub metadata: Option<Metadata>,
    pub data: Vec<ArtifactData>,
}

impl Artifact {
    /// The key identifying this artifact.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(self.dataset.clone(), self.id.clone())
    }
}

/// A mutable name pointing at an artifact within a dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub dataset: DatasetId,
    pub artifact_id: String,
}
