//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub artifacts: ArtifactStoreConfig,
}

impl AppConfig {
    /// Validate all sections.
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;
        self.artifacts.validate()?;
        Ok(())
    }
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
    /// Maximum accepted request body in bytes. Payload parts travel base64
    /// encoded inside JSON, so this bounds the size of a single create.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_enabled: default_metrics_enabled(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/storage"),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Filesystem { path } if path.as_os_str().is_empty() => {
                Err("filesystem storage requires a non-empty path".to_string())
            }
            StorageConfig::Filesystem { .. } => Ok(()),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds (advisory only - SQLite cannot force-cancel queries).
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(600) // 10 minutes (advisory only)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

/// Where offloaded payload parts are written inside the object store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtifactStoreConfig {
    /// Key prefix for all payload part objects.
    #[serde(default = "default_artifact_prefix")]
    pub prefix: String,
}

fn default_artifact_prefix() -> String {
    "artifacts".to_string()
}

impl Default for ArtifactStoreConfig {
    fn default() -> Self {
        Self {
            prefix: default_artifact_prefix(),
        }
    }
}

impl ArtifactStoreConfig {
    /// Validate the prefix is a relative, traversal-free key segment.
    pub fn validate(&self) -> Result<(), String> {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            return Err("artifacts.prefix must not be empty".to_string());
        }
        if prefix.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
            return Err(format!(
                "artifacts.prefix contains an invalid segment: {}",
                self.prefix
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults_metrics_enabled() {
        let config = ServerConfig::default();
        assert!(config.metrics_enabled);
        assert_eq!(config.bind, "127.0.0.1:8080");
    }

    #[test]
    fn test_app_config_deserialize_empty() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.artifacts.prefix, "artifacts");
        assert!(config.validate().is_ok());
        match config.metadata {
            MetadataConfig::Sqlite {
                query_timeout_secs, ..
            } => assert_eq!(query_timeout_secs, Some(600)),
        }
    }

    #[test]
    fn test_storage_config_filesystem_roundtrip() {
        let json = r#"{"type":"filesystem","path":"/var/lib/catalog"}"#;
        let config: StorageConfig = serde_json::from_str(json).unwrap();
        match config {
            StorageConfig::Filesystem { ref path } => {
                assert_eq!(path, &PathBuf::from("/var/lib/catalog"))
            }
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_artifact_prefix_validation() {
        let ok = ArtifactStoreConfig {
            prefix: "catalog/artifacts".to_string(),
        };
        assert!(ok.validate().is_ok());

        for bad in ["", "/", "a//b", "../escape", "a/./b"] {
            let config = ArtifactStoreConfig {
                prefix: bad.to_string(),
            };
            assert!(config.validate().is_err(), "prefix {bad:?} should be rejected");
        }
    }
}
