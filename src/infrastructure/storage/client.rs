//! Typed access to the document store

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::storage::{DocumentStore, KeyStrategy, StorageEntity};
use crate::domain::text::dedup;
use crate::domain::DomainError;

/// Loads and saves serde records on top of a [`DocumentStore`].
///
/// The key a record is saved under is decided by the [`KeyStrategy`] passed
/// to each save call.
#[derive(Clone)]
pub struct DocumentClient {
    store: Arc<dyn DocumentStore>,
}

impl Debug for DocumentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentClient").finish_non_exhaustive()
    }
}

impl DocumentClient {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Loads a record by key, `None` if it does not exist
    pub async fn load<E: StorageEntity>(&self, key: &str) -> Result<Option<E>, DomainError> {
        let document = self.store.get_document(E::COLLECTION, key).await?;
        debug!(
            "Loaded document: collection={}, key={}, found={}",
            E::COLLECTION,
            key,
            document.is_some()
        );

        document
            .map(|doc| {
                serde_json::from_value(doc).map_err(|e| {
                    DomainError::storage(format!(
                        "Failed to decode {} document '{}': {}",
                        E::COLLECTION,
                        key,
                        e
                    ))
                })
            })
            .transpose()
    }

    /// Saves one record, returning it as stored (with any generated key)
    pub async fn save<E, K>(&self, mut entity: E, strategy: &K) -> Result<E, DomainError>
    where
        E: StorageEntity,
        K: KeyStrategy<E>,
    {
        let key = strategy.prepare(&mut entity);

        if key.is_empty() {
            return Err(DomainError::validation(format!(
                "Cannot save {} document without a key",
                E::COLLECTION
            )));
        }

        let document = serde_json::to_value(&entity).map_err(|e| {
            DomainError::storage(format!("Failed to encode {} document: {}", E::COLLECTION, e))
        })?;

        self.store.set_document(E::COLLECTION, &key, document).await?;
        debug!("Saved document: collection={}, key={}", E::COLLECTION, key);

        Ok(entity)
    }

    /// Saves a batch. Records that fail are logged and skipped; the records
    /// that were stored are returned.
    pub async fn save_all<E, K>(&self, entities: Vec<E>, strategy: &K) -> Vec<E>
    where
        E: StorageEntity,
        K: KeyStrategy<E>,
    {
        let mut saved = Vec::with_capacity(entities.len());

        for entity in entities {
            match self.save(entity, strategy).await {
                Ok(stored) => saved.push(stored),
                Err(e) => error!("Failed to save {} document: {}", E::COLLECTION, e),
            }
        }

        saved
    }

    /// Returns the keys that are already taken in the record's collection,
    /// each once, in the order first asked for
    pub async fn existing_keys<E: StorageEntity>(
        &self,
        keys: &[String],
    ) -> Result<Vec<String>, DomainError> {
        let keys = dedup(keys);
        self.store.existing_keys(E::COLLECTION, &keys).await
    }

    pub async fn delete<E: StorageEntity>(&self, key: &str) -> Result<bool, DomainError> {
        self.store.delete_document(E::COLLECTION, key).await
    }
}
