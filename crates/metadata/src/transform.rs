//! Conversions between domain values and metadata rows.

use crate::models::{ArtifactDataRow, ArtifactRecord, ArtifactRow, DatasetRow};
use catalog_core::{
    Artifact, ArtifactDataRef, Dataset, Error, Result, decode_metadata, encode_metadata,
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Build a new dataset row with a fresh surrogate id.
pub fn to_dataset_row(dataset: &Dataset) -> Result<DatasetRow> {
    Ok(DatasetRow {
        dataset_uuid: Uuid::new_v4(),
        project: dataset.id.project.clone(),
        domain: dataset.id.domain.clone(),
        name: dataset.id.name.clone(),
        version: dataset.id.version.clone(),
        serialized_metadata: Some(encode_metadata(Some(&dataset.metadata))?),
        created_at: OffsetDateTime::now_utc(),
    })
}

/// Build the persistable record for an artifact whose payload parts have
/// already been offloaded to `data`.
pub fn to_artifact_rows(
    dataset_uuid: Uuid,
    artifact: &Artifact,
    data: &[ArtifactDataRef],
) -> Result<(ArtifactRow, Vec<ArtifactDataRow>)> {
    let row = ArtifactRow {
        dataset_uuid,
        artifact_id: artifact.id.clone(),
        serialized_metadata: Some(encode_metadata(artifact.metadata.as_ref())?),
        created_at: OffsetDateTime::now_utc(),
    };

    let data_rows = data
        .iter()
        .enumerate()
        .map(|(position, data_ref)| {
            let position = i32::try_from(position).map_err(|_| {
                Error::InvalidArtifact(format!("too many payload parts: {}", data.len()))
            })?;
            Ok(ArtifactDataRow {
                dataset_uuid,
                artifact_id: artifact.id.clone(),
                position,
                name: data_ref.name.clone(),
                location: data_ref.location.clone(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((row, data_rows))
}

/// Decode an artifact record into the domain value, without payload bytes.
///
/// The returned artifact has an empty `data` list; callers rehydrate the
/// parts from the record's location references.
pub fn from_artifact_record(record: &ArtifactRecord) -> Result<Artifact> {
    Ok(Artifact {
        id: record.artifact.artifact_id.clone(),
        dataset: record.dataset.clone(),
        metadata: Some(decode_metadata(
            record.artifact.serialized_metadata.as_deref(),
        )?),
        data: Vec::new(),
    })
}
