//! Storage factory for runtime backend selection

use std::sync::Arc;

use tracing::info;

use crate::config::StorageSettings;
use crate::domain::storage::DocumentStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryDocumentStore;
use super::postgres::{PostgresConfig, PostgresDocumentStore};

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration and table name
    Postgres(PostgresConfig, String),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    pub fn postgres(config: PostgresConfig, table_name: impl Into<String>) -> Self {
        Self::Postgres(config, table_name.into())
    }

    /// Builds the storage configuration from application settings
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, DomainError> {
        let storage_type = StorageType::from_str(&settings.backend).ok_or_else(|| {
            DomainError::configuration(format!("Unknown storage backend: {}", settings.backend))
        })?;

        match storage_type {
            StorageType::InMemory => Ok(Self::InMemory),
            StorageType::Postgres => {
                let url = settings.url.clone().ok_or_else(|| {
                    DomainError::configuration("storage.url is required for postgres")
                })?;
                let pg = PostgresConfig::new(url).with_max_connections(settings.max_connections);
                Ok(Self::postgres(pg, settings.table.clone()))
            }
        }
    }

    /// False for the in-memory backend, whose data is gone once the process exits
    pub fn is_persistent(&self) -> bool {
        !matches!(self, Self::InMemory)
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(..) => StorageType::Postgres,
        }
    }
}

/// Factory for creating document stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a document store based on the configuration
    pub async fn create(config: &StorageConfig) -> Result<Arc<dyn DocumentStore>, DomainError> {
        match config {
            StorageConfig::InMemory => {
                info!("Using in-memory document store");
                Ok(Arc::new(InMemoryDocumentStore::new()))
            }
            StorageConfig::Postgres(pg_config, table_name) => {
                info!("Using PostgreSQL document store: table={}", table_name);
                let store = PostgresDocumentStore::connect(pg_config, table_name.as_str()).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(backend: &str, url: Option<&str>) -> StorageSettings {
        StorageSettings {
            backend: backend.to_string(),
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("in-memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("Postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("firestore"), None);
    }

    #[test]
    fn test_from_settings_memory() {
        let config = StorageConfig::from_settings(&settings("memory", None)).unwrap();
        assert_eq!(config.storage_type(), StorageType::InMemory);
        assert!(!config.is_persistent());
    }

    #[test]
    fn test_from_settings_postgres() {
        let config =
            StorageConfig::from_settings(&settings("postgres", Some("postgres://db/xpost")))
                .unwrap();

        match config {
            StorageConfig::Postgres(ref pg, ref table) => {
                assert_eq!(pg.url, "postgres://db/xpost");
                assert_eq!(table, "documents");
            }
            StorageConfig::InMemory => panic!("Expected Postgres config"),
        }
        assert!(config.is_persistent());
    }

    #[test]
    fn test_from_settings_postgres_requires_url() {
        let result = StorageConfig::from_settings(&settings("postgres", None));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[test]
    fn test_from_settings_unknown_backend() {
        let result = StorageConfig::from_settings(&settings("firestore", None));
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = StorageFactory::create(&StorageConfig::in_memory()).await.unwrap();
        assert!(store.get_document("accounts", "x").await.unwrap().is_none());
    }
}
