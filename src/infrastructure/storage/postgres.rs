//! PostgreSQL document store with connection pooling

use std::fmt::Debug;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use crate::domain::storage::{Document, DocumentStore};
use crate::domain::DomainError;

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/xpost".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }
}

/// Document store backed by a single JSONB table.
///
/// Rows are `(collection, key, data)` with the pair `(collection, key)` as
/// primary key, mirroring a collection/document layout.
pub struct PostgresDocumentStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresDocumentStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Connects a pool and wraps it
    pub async fn connect(
        config: &PostgresConfig,
        table_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(std::time::Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool, table_name))
    }

    /// Ensures the documents table exists
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                collection VARCHAR(100) NOT NULL,
                key VARCHAR(255) NOT NULL,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (collection, key)
            )
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create table: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DomainError> {
        let query = format!(
            "SELECT data FROM {} WHERE collection = $1 AND key = $2",
            self.table_name
        );

        let row = sqlx::query(&query)
            .bind(collection)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get document: {}", e)))?;

        Ok(row.map(|r| r.get::<serde_json::Value, _>("data")))
    }

    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<(), DomainError> {
        let query = format!(
            r#"
            INSERT INTO {} (collection, key, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, key)
            DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()
            "#,
            self.table_name
        );

        sqlx::query(&query)
            .bind(collection)
            .bind(key)
            .bind(&document)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to set document: {}", e)))?;

        Ok(())
    }

    async fn existing_keys(
        &self,
        collection: &str,
        keys: &[String],
    ) -> Result<Vec<String>, DomainError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT key FROM {} WHERE collection = $1 AND key = ANY($2)",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .bind(collection)
            .bind(keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to check keys: {}", e)))?;

        let found: Vec<String> = rows.iter().map(|r| r.get("key")).collect();

        Ok(keys.iter().filter(|k| found.contains(k)).cloned().collect())
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<bool, DomainError> {
        let query = format!(
            "DELETE FROM {} WHERE collection = $1 AND key = $2",
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete document: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
