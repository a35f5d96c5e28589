//! Artifact orchestration and HTTP API for the artifact catalog.
//!
//! This crate provides:
//! - The artifact manager sequencing payload offload and metadata writes
//! - Request validation
//! - Artifact operation metrics
//! - The HTTP binding (datasets, artifacts, tags, health, metrics)

pub mod error;
pub mod handlers;
pub mod manager;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod validators;

pub use error::{ApiError, CatalogError, ErrorKind};
pub use manager::ArtifactManager;
pub use metrics::{ArtifactEvent, ArtifactReporter, NoopReporter, Operation, PrometheusReporter};
pub use routes::create_router;
pub use state::AppState;
pub use validators::ValidationError;
