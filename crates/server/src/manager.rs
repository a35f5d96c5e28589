//! Artifact manager: sequences payload offload and metadata persistence.
//!
//! A create resolves the dataset, writes every payload part to the data
//! store in input order, and only then persists the artifact record. Parts
//! written before a later failure are left in place; a failed create means
//! "possibly leaked payload bytes, never a metadata record".
//!
//! A get resolves the artifact (directly or through a tag), requires at
//! least one recorded part, decodes the metadata and reads every part back.
//! Either all parts are returned or the call fails.

use crate::error::CatalogError;
use crate::metrics::{ArtifactEvent, ArtifactReporter, Operation};
use crate::validators::{validate_create_request, validate_get_artifact_request};
use catalog_core::{
    ArtifactData, ArtifactQuery, CreateArtifactRequest, CreateArtifactResponse,
    GetArtifactRequest, GetArtifactResponse,
};
use catalog_metadata::MetadataStore;
use catalog_metadata::models::ArtifactRecord;
use catalog_metadata::transform;
use catalog_storage::ArtifactDataStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

pub struct ArtifactManager {
    metadata: Arc<dyn MetadataStore>,
    data_store: Arc<dyn ArtifactDataStore>,
    reporter: Arc<dyn ArtifactReporter>,
}

impl ArtifactManager {
    pub fn new(
        metadata: Arc<dyn MetadataStore>,
        data_store: Arc<dyn ArtifactDataStore>,
        reporter: Arc<dyn ArtifactReporter>,
    ) -> Self {
        Self {
            metadata,
            data_store,
            reporter,
        }
    }

    /// Create an artifact, offloading its payload parts first.
    #[instrument(
        skip_all,
        fields(
            project = %request.artifact.dataset.project,
            domain = %request.artifact.dataset.domain,
            artifact_id = %request.artifact.id,
        )
    )]
    pub async fn create_artifact(
        &self,
        request: &CreateArtifactRequest,
    ) -> Result<CreateArtifactResponse, CatalogError> {
        let started = Instant::now();
        let result = self.create(request).await;
        self.reporter
            .observe_duration(Operation::Create, started.elapsed());
        result
    }

    /// Get an artifact by id or tag, with all payload parts rehydrated.
    #[instrument(
        skip_all,
        fields(project = %request.dataset.project, domain = %request.dataset.domain)
    )]
    pub async fn get_artifact(
        &self,
        request: &GetArtifactRequest,
    ) -> Result<GetArtifactResponse, CatalogError> {
        let started = Instant::now();
        let result = self.get(request).await;
        self.reporter
            .observe_duration(Operation::Get, started.elapsed());
        result
    }

    async fn create(
        &self,
        request: &CreateArtifactRequest,
    ) -> Result<CreateArtifactResponse, CatalogError> {
        if let Err(e) = validate_create_request(request) {
            self.reporter.record(ArtifactEvent::ValidationFailed);
            return Err(e.into());
        }
        let artifact = &request.artifact;

        let dataset = match self.metadata.get_dataset(&artifact.dataset).await {
            Ok(Some(dataset)) => dataset,
            Ok(None) => {
                self.reporter.record(ArtifactEvent::CreateFailed);
                return Err(CatalogError::NotFound(format!(
                    "dataset {}",
                    artifact.dataset
                )));
            }
            Err(e) => {
                self.reporter.record(ArtifactEvent::CreateFailed);
                return Err(CatalogError::Lookup(e));
            }
        };

        let key = artifact.key();
        let mut data_refs = Vec::with_capacity(artifact.data.len());
        for part in &artifact.data {
            match self.data_store.put_data(&key, part).await {
                Ok(data_ref) => {
                    data_refs.push(data_ref);
                    self.reporter.record(ArtifactEvent::CreateDataSucceeded);
                }
                Err(source) => {
                    self.reporter.record(ArtifactEvent::CreateDataFailed);
                    self.reporter.record(ArtifactEvent::CreateFailed);
                    tracing::warn!(
                        part = %part.name,
                        offloaded = data_refs.len(),
                        error = %source,
                        "artifact data write failed, earlier parts are not rolled back"
                    );
                    return Err(CatalogError::DataWrite {
                        part: part.name.clone(),
                        source,
                    });
                }
            }
        }

        let (row, data_rows) =
            match transform::to_artifact_rows(dataset.dataset_uuid, artifact, &data_refs) {
                Ok(rows) => rows,
                Err(e) => {
                    self.reporter.record(ArtifactEvent::TransformFailed);
                    return Err(CatalogError::Transform(e));
                }
            };

        if let Err(e) = self.metadata.create_artifact(&row, &data_rows).await {
            self.reporter.record(ArtifactEvent::CreateFailed);
            return Err(CatalogError::MetadataWrite(e));
        }

        self.reporter.record(ArtifactEvent::CreateSucceeded);
        tracing::info!(parts = data_rows.len(), "artifact created");
        Ok(CreateArtifactResponse)
    }

    async fn get(&self, request: &GetArtifactRequest) -> Result<GetArtifactResponse, CatalogError> {
        let query = match validate_get_artifact_request(request) {
            Ok(query) => query,
            Err(e) => {
                self.reporter.record(ArtifactEvent::ValidationFailed);
                return Err(e.into());
            }
        };

        let record = match self.resolve(request, &query).await {
            Ok(record) => record,
            Err(e) => {
                self.reporter.record(ArtifactEvent::GetFailed);
                return Err(e);
            }
        };

        if record.data.is_empty() {
            self.reporter.record(ArtifactEvent::GetFailed);
            return Err(CatalogError::MissingArtifactData(format!(
                "{}#{}",
                record.dataset, record.artifact.artifact_id
            )));
        }

        let mut artifact = match transform::from_artifact_record(&record) {
            Ok(artifact) => artifact,
            Err(e) => {
                self.reporter.record(ArtifactEvent::TransformFailed);
                return Err(CatalogError::Decode(e));
            }
        };

        artifact.data.reserve(record.data.len());
        for data_row in &record.data {
            let data_ref = data_row.to_data_ref();
            match self.data_store.get_data(&data_ref).await {
                Ok(value) => artifact.data.push(ArtifactData {
                    name: data_ref.name,
                    value,
                }),
                Err(source) => {
                    self.reporter.record(ArtifactEvent::GetFailed);
                    return Err(CatalogError::DataRead {
                        part: data_ref.name,
                        source,
                    });
                }
            }
        }

        self.reporter.record(ArtifactEvent::GetSucceeded);
        Ok(GetArtifactResponse { artifact })
    }

    /// Look up the artifact record a query points at.
    async fn resolve(
        &self,
        request: &GetArtifactRequest,
        query: &ArtifactQuery,
    ) -> Result<ArtifactRecord, CatalogError> {
        let dataset = &request.dataset;
        match query {
            ArtifactQuery::ById(artifact_id) => self
                .metadata
                .get_artifact(dataset, artifact_id)
                .await
                .map_err(CatalogError::Lookup)?
                .ok_or_else(|| {
                    CatalogError::NotFound(format!("artifact {artifact_id} in dataset {dataset}"))
                }),
            ArtifactQuery::ByTag(tag_name) => self
                .metadata
                .get_tag(dataset, tag_name)
                .await
                .map_err(CatalogError::Lookup)?
                .map(|tag| tag.artifact)
                .ok_or_else(|| {
                    CatalogError::NotFound(format!("tag {tag_name} in dataset {dataset}"))
                }),
        }
    }
}
