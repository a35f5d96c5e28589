//! Core domain types and shared logic for the artifact catalog.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Dataset identifiers
//! - Artifacts, payload parts and their stored location references
//! - Tags and the get-by query selector
//! - The metadata blob codec
//! - Shared configuration

pub mod artifact;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metadata;
pub mod request;

pub use artifact::{Artifact, ArtifactData, ArtifactDataRef, ArtifactKey, Tag};
pub use dataset::{Dataset, DatasetId};
pub use error::{Error, Result};
pub use metadata::{Metadata, decode_metadata, encode_metadata};
pub use request::{
    ArtifactQuery, CreateArtifactRequest, CreateArtifactResponse, GetArtifactRequest,
    GetArtifactResponse,
};
