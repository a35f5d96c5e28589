//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{ArtifactRepo, DatasetRepo, TagRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: DatasetRepo + ArtifactRepo + TagRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let query_timeout_secs = query_timeout_secs.unwrap_or(600);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MetadataError::Config(format!(
                    "failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits one writer; a single connection keeps request
            // handlers from tripping over each other's locks.
            .max_connections(1)
            // Bounds how long a statement waits for the connection.
            .acquire_timeout(Duration::from_secs(query_timeout_secs))
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            query_timeout_secs,
            "opened sqlite metadata store"
        );

        Ok(store)
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether a database error reports a UNIQUE or PRIMARY KEY violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint")
        }
        _ => false,
    }
}

/// Whether a database error reports a FOREIGN KEY violation.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_foreign_key_violation()
                || db_err.message().contains("FOREIGN KEY constraint")
        }
        _ => false,
    }
}

// Implement all the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use catalog_core::DatasetId;
    use time::OffsetDateTime;
    use uuid::Uuid;

    impl SqliteStore {
        async fn dataset_uuid<'e, E>(executor: E, id: &DatasetId) -> MetadataResult<Option<Uuid>>
        where
            E: sqlx::Executor<'e, Database = Sqlite>,
        {
            let uuid = sqlx::query_scalar(
                r#"
                SELECT dataset_uuid FROM datasets
                WHERE project = ? AND domain = ? AND name = ? AND version = ?
                "#,
            )
            .bind(&id.project)
            .bind(&id.domain)
            .bind(&id.name)
            .bind(&id.version)
            .fetch_optional(executor)
            .await?;
            Ok(uuid)
        }

        async fn load_artifact_data(
            conn: &mut sqlx::SqliteConnection,
            dataset_uuid: Uuid,
            artifact_id: &str,
        ) -> MetadataResult<Vec<ArtifactDataRow>> {
            let rows = sqlx::query_as::<_, ArtifactDataRow>(
                r#"
                SELECT dataset_uuid, artifact_id, position, name, location
                FROM artifact_data
                WHERE dataset_uuid = ? AND artifact_id = ?
                ORDER BY position ASC
                "#,
            )
            .bind(dataset_uuid)
            .bind(artifact_id)
            .fetch_all(conn)
            .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl DatasetRepo for SqliteStore {
        async fn create_dataset(&self, dataset: &DatasetRow) -> MetadataResult<()> {
            let result = sqlx::query(
                r#"
                INSERT INTO datasets (
                    dataset_uuid, project, domain, name, version,
                    serialized_metadata, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(dataset.dataset_uuid)
            .bind(&dataset.project)
            .bind(&dataset.domain)
            .bind(&dataset.name)
            .bind(&dataset.version)
            .bind(&dataset.serialized_metadata)
            .bind(dataset.created_at)
            .execute(&self.pool)
            .await;

            match result {
                Ok(_) => Ok(()),
                Err(e) if is_unique_violation(&e) => Err(MetadataError::AlreadyExists(format!(
                    "dataset {}",
                    dataset.dataset_id()
                ))),
                Err(e) => Err(e.into()),
            }
        }

        async fn get_dataset(&self, id: &DatasetId) -> MetadataResult<Option<DatasetRow>> {
            let row = sqlx::query_as::<_, DatasetRow>(
                r#"
                SELECT dataset_uuid, project, domain, name, version,
                       serialized_metadata, created_at
                FROM datasets
                WHERE project = ? AND domain = ? AND name = ? AND version = ?
                "#,
            )
            .bind(&id.project)
            .bind(&id.domain)
            .bind(&id.name)
            .bind(&id.version)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }
    }

    #[async_trait]
    impl ArtifactRepo for SqliteStore {
        async fn create_artifact(
            &self,
            artifact: &ArtifactRow,
            data: &[ArtifactDataRow],
        ) -> MetadataResult<()> {
            let mut tx = self.pool.begin().await?;

            let dataset_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM datasets WHERE dataset_uuid = ?)",
            )
            .bind(artifact.dataset_uuid)
            .fetch_one(&mut *tx)
            .await?;
            if !dataset_exists {
                return Err(MetadataError::NotFound(format!(
                    "dataset {}",
                    artifact.dataset_uuid
                )));
            }

            let inserted = sqlx::query(
                r#"
                INSERT INTO artifacts (dataset_uuid, artifact_id, serialized_metadata, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(artifact.dataset_uuid)
            .bind(&artifact.artifact_id)
            .bind(&artifact.serialized_metadata)
            .bind(artifact.created_at)
            .execute(&mut *tx)
            .await;

            match inserted {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => {
                    return Err(MetadataError::AlreadyExists(format!(
                        "artifact {}",
                        artifact.artifact_id
                    )));
                }
                Err(e) if is_foreign_key_violation(&e) => {
                    return Err(MetadataError::NotFound(format!(
                        "dataset {}",
                        artifact.dataset_uuid
                    )));
                }
                Err(e) => return Err(e.into()),
            }

            for row in data {
                let inserted = sqlx::query(
                    r#"
                    INSERT INTO artifact_data (dataset_uuid, artifact_id, position, name, location)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(row.dataset_uuid)
                .bind(&row.artifact_id)
                .bind(row.position)
                .bind(&row.name)
                .bind(&row.location)
                .execute(&mut *tx)
                .await;

                match inserted {
                    Ok(_) => {}
                    Err(e) if is_unique_violation(&e) => {
                        return Err(MetadataError::Constraint(format!(
                            "duplicate payload part {} in artifact {}",
                            row.name, row.artifact_id
                        )));
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            tx.commit().await?;
            Ok(())
        }

        async fn get_artifact(
            &self,
            dataset: &DatasetId,
            artifact_id: &str,
        ) -> MetadataResult<Option<ArtifactRecord>> {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query_as::<_, ArtifactRow>(
                r#"
                SELECT a.dataset_uuid, a.artifact_id, a.serialized_metadata, a.created_at
                FROM artifacts a
                JOIN datasets d ON d.dataset_uuid = a.dataset_uuid
                WHERE d.project = ? AND d.domain = ? AND d.name = ? AND d.version = ?
                  AND a.artifact_id = ?
                "#,
            )
            .bind(&dataset.project)
            .bind(&dataset.domain)
            .bind(&dataset.name)
            .bind(&dataset.version)
            .bind(artifact_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = row else {
                return Ok(None);
            };

            let data = Self::load_artifact_data(&mut tx, row.dataset_uuid, &row.artifact_id).await?;
            tx.commit().await?;

            Ok(Some(ArtifactRecord {
                dataset: dataset.clone(),
                artifact: row,
                data,
            }))
        }
    }

    #[async_trait]
    impl TagRepo for SqliteStore {
        async fn upsert_tag(
            &self,
            dataset: &DatasetId,
            tag_name: &str,
            artifact_id: &str,
        ) -> MetadataResult<()> {
            let mut tx = self.pool.begin().await?;

            let dataset_uuid = Self::dataset_uuid(&mut *tx, dataset)
                .await?
                .ok_or_else(|| MetadataError::NotFound(format!("dataset {dataset}")))?;

            let artifact_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM artifacts WHERE dataset_uuid = ? AND artifact_id = ?)",
            )
            .bind(dataset_uuid)
            .bind(artifact_id)
            .fetch_one(&mut *tx)
            .await?;
            if !artifact_exists {
                return Err(MetadataError::NotFound(format!(
                    "artifact {artifact_id} in dataset {dataset}"
                )));
            }

            let now = OffsetDateTime::now_utc();
            sqlx::query(
                r#"
                INSERT INTO tags (dataset_uuid, tag_name, artifact_id, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                ON CONFLICT (dataset_uuid, tag_name) DO UPDATE SET
                    artifact_id = excluded.artifact_id,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(dataset_uuid)
            .bind(tag_name)
            .bind(artifact_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(())
        }

        async fn get_tag(
            &self,
            dataset: &DatasetId,
            tag_name: &str,
        ) -> MetadataResult<Option<TagRecord>> {
            let mut tx = self.pool.begin().await?;

            let tag = sqlx::query_as::<_, TagRow>(
                r#"
                SELECT t.dataset_uuid, t.tag_name, t.artifact_id, t.created_at, t.updated_at
                FROM tags t
                JOIN datasets d ON d.dataset_uuid = t.dataset_uuid
                WHERE d.project = ? AND d.domain = ? AND d.name = ? AND d.version = ?
                  AND t.tag_name = ?
                "#,
            )
            .bind(&dataset.project)
            .bind(&dataset.domain)
            .bind(&dataset.name)
            .bind(&dataset.version)
            .bind(tag_name)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(tag) = tag else {
                return Ok(None);
            };

            let artifact = sqlx::query_as::<_, ArtifactRow>(
                r#"
                SELECT dataset_uuid, artifact_id, serialized_metadata, created_at
                FROM artifacts
                WHERE dataset_uuid = ? AND artifact_id = ?
                "#,
            )
            .bind(tag.dataset_uuid)
            .bind(&tag.artifact_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                MetadataError::Internal(format!(
                    "tag {tag_name} points at missing artifact {}",
                    tag.artifact_id
                ))
            })?;

            let data =
                Self::load_artifact_data(&mut tx, artifact.dataset_uuid, &artifact.artifact_id)
                    .await?;
            tx.commit().await?;

            Ok(Some(TagRecord {
                tag,
                artifact: ArtifactRecord {
                    dataset: dataset.clone(),
                    artifact,
                    data,
                },
            }))
        }
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS datasets (
    dataset_uuid BLOB PRIMARY KEY,
    project TEXT NOT NULL,
    domain TEXT NOT NULL,
    name TEXT NOT NULL,
    version TEXT NOT NULL,
    serialized_metadata BLOB,
    created_at TEXT NOT NULL,
    UNIQUE (project, domain, name, version)
);

CREATE TABLE IF NOT EXISTS artifacts (
    dataset_uuid BLOB NOT NULL REFERENCES datasets(dataset_uuid),
    artifact_id TEXT NOT NULL,
    serialized_metadata BLOB,
    created_at TEXT NOT NULL,
    PRIMARY KEY (dataset_uuid, artifact_id)
);

CREATE TABLE IF NOT EXISTS artifact_data (
    dataset_uuid BLOB NOT NULL,
    artifact_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    name TEXT NOT NULL,
    location TEXT NOT NULL,
    PRIMARY KEY (dataset_uuid, artifact_id, name),
    UNIQUE (dataset_uuid, artifact_id, position),
    FOREIGN KEY (dataset_uuid, artifact_id)
        REFERENCES artifacts(dataset_uuid, artifact_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS tags (
    dataset_uuid BLOB NOT NULL,
    tag_name TEXT NOT NULL,
    artifact_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (dataset_uuid, tag_name),
    FOREIGN KEY (dataset_uuid, artifact_id)
        REFERENCES artifacts(dataset_uuid, artifact_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_tags_artifact ON tags(dataset_uuid, artifact_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtifactDataRow, ArtifactRow, DatasetRow};
    use catalog_core::DatasetId;
    use time::OffsetDateTime;
    use uuid::Uuid;

    async fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("metadata.db"), None)
            .await
            .unwrap();
        (dir, store)
    }

    fn dataset_row(id: &DatasetId) -> DatasetRow {
        DatasetRow {
            dataset_uuid: Uuid::new_v4(),
            project: id.project.clone(),
            domain: id.domain.clone(),
            name: id.name.clone(),
            version: id.version.clone(),
            serialized_metadata: Some(b"{}".to_vec()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn artifact_row(dataset_uuid: Uuid, artifact_id: &str) -> ArtifactRow {
        ArtifactRow {
            dataset_uuid,
            artifact_id: artifact_id.to_string(),
            serialized_metadata: Some(b"{}".to_vec()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn data_row(dataset_uuid: Uuid, artifact_id: &str, position: i32, name: &str) -> ArtifactDataRow {
        ArtifactDataRow {
            dataset_uuid,
            artifact_id: artifact_id.to_string(),
            position,
            name: name.to_string(),
            location: format!("loc/{artifact_id}/{name}"),
        }
    }

    #[tokio::test]
    async fn test_dataset_create_and_get() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        let row = dataset_row(&id);
        store.create_dataset(&row).await.unwrap();

        let fetched = store.get_dataset(&id).await.unwrap().unwrap();
        assert_eq!(fetched.dataset_uuid, row.dataset_uuid);
        assert_eq!(fetched.dataset_id(), id);

        let missing = DatasetId::new("p", "d", "n", "other");
        assert!(store.get_dataset(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_dataset_rejected() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        store.create_dataset(&dataset_row(&id)).await.unwrap();
        let err = store.create_dataset(&dataset_row(&id)).await.unwrap_err();
        assert!(err.is_already_exists());
    }

    #[tokio::test]
    async fn test_artifact_parts_returned_in_stored_order() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        let ds = dataset_row(&id);
        store.create_dataset(&ds).await.unwrap();

        let data = vec![
            data_row(ds.dataset_uuid, "a1", 0, "zeta"),
            data_row(ds.dataset_uuid, "a1", 1, "alpha"),
            data_row(ds.dataset_uuid, "a1", 2, "mid"),
        ];
        store
            .create_artifact(&artifact_row(ds.dataset_uuid, "a1"), &data)
            .await
            .unwrap();

        let record = store.get_artifact(&id, "a1").await.unwrap().unwrap();
        let names: Vec<_> = record.data.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(record.dataset, id);
    }

    #[tokio::test]
    async fn test_duplicate_artifact_leaves_first_intact() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        let ds = dataset_row(&id);
        store.create_dataset(&ds).await.unwrap();

        store
            .create_artifact(
                &artifact_row(ds.dataset_uuid, "a1"),
                &[data_row(ds.dataset_uuid, "a1", 0, "x")],
            )
            .await
            .unwrap();

        let err = store
            .create_artifact(
                &artifact_row(ds.dataset_uuid, "a1"),
                &[data_row(ds.dataset_uuid, "a1", 0, "y")],
            )
            .await
            .unwrap_err();
        assert!(err.is_already_exists());

        let record = store.get_artifact(&id, "a1").await.unwrap().unwrap();
        assert_eq!(record.data.len(), 1);
        assert_eq!(record.data[0].name, "x");
    }

    #[tokio::test]
    async fn test_artifact_requires_dataset() {
        let (_dir, store) = store().await;
        let err = store
            .create_artifact(&artifact_row(Uuid::new_v4(), "a1"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tag_resolves_and_moves() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        let ds = dataset_row(&id);
        store.create_dataset(&ds).await.unwrap();
        for artifact_id in ["a1", "a2"] {
            store
                .create_artifact(
                    &artifact_row(ds.dataset_uuid, artifact_id),
                    &[data_row(ds.dataset_uuid, artifact_id, 0, "x")],
                )
                .await
                .unwrap();
        }

        store.upsert_tag(&id, "latest", "a1").await.unwrap();
        let tag = store.get_tag(&id, "latest").await.unwrap().unwrap();
        assert_eq!(tag.artifact.artifact.artifact_id, "a1");
        assert_eq!(tag.artifact.data.len(), 1);

        store.upsert_tag(&id, "latest", "a2").await.unwrap();
        let tag = store.get_tag(&id, "latest").await.unwrap().unwrap();
        assert_eq!(tag.tag.artifact_id, "a2");
        assert_eq!(tag.artifact.artifact.artifact_id, "a2");

        assert!(store.get_tag(&id, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tag_requires_artifact() {
        let (_dir, store) = store().await;
        let id = DatasetId::new("p", "d", "n", "v");
        store.create_dataset(&dataset_row(&id)).await.unwrap();
        let err = store.upsert_tag(&id, "latest", "nope").await.unwrap_err();
        assert!(matches!(err, MetadataError::NotFound(_)));
    }
}
