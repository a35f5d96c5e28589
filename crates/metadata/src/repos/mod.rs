//! Repository traits for metadata operations.

pub mod artifacts;
pub mod datasets;
pub mod tags;

pub use artifacts::ArtifactRepo;
pub use datasets::DatasetRepo;
pub use tags::TagRepo;
