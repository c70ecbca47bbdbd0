//! In-memory document store implementation

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Document, DocumentStore};
use crate::domain::DomainError;

type Collections = HashMap<String, HashMap<String, Document>>;

/// Thread-safe in-memory document store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, HashMap::len))
            .unwrap_or(0)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DomainError> {
        let collections = self.collections.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<(), DomainError> {
        let mut collections = self.collections.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn existing_keys(
        &self,
        collection: &str,
        keys: &[String],
    ) -> Result<Vec<String>, DomainError> {
        let collections = self.collections.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(keys
            .iter()
            .filter(|key| docs.contains_key(key.as_str()))
            .cloned()
            .collect())
    }

    async fn delete_document(&self, collection: &str, key: &str) -> Result<bool, DomainError> {
        let mut collections = self.collections.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(collections
            .get_mut(collection)
            .is_some_and(|docs| docs.remove(key).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryDocumentStore::new();
        let doc = json!({ "id": "x-1", "plan": 1 });

        store.set_document("accounts", "x-1", doc.clone()).await.unwrap();

        let result = store.get_document("accounts", "x-1").await.unwrap();
        assert_eq!(result, Some(doc));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryDocumentStore::new();

        assert!(store.get_document("accounts", "x-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = InMemoryDocumentStore::new();

        store.set_document("accounts", "x-1", json!({ "v": 1 })).await.unwrap();
        store.set_document("accounts", "x-1", json!({ "v": 2 })).await.unwrap();

        let result = store.get_document("accounts", "x-1").await.unwrap().unwrap();
        assert_eq!(result["v"], 2);
        assert_eq!(store.len("accounts"), 1);
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let store = InMemoryDocumentStore::new();

        store.set_document("accounts", "k", json!({})).await.unwrap();

        assert!(store.get_document("posts", "k").await.unwrap().is_none());
        assert_eq!(store.len("posts"), 0);
    }

    #[tokio::test]
    async fn test_existing_keys_keeps_input_order() {
        let store = InMemoryDocumentStore::new();
        store.set_document("accounts", "b", json!({})).await.unwrap();
        store.set_document("accounts", "a", json!({})).await.unwrap();

        let keys = vec!["a".to_string(), "c".to_string(), "b".to_string()];
        let existing = store.existing_keys("accounts", &keys).await.unwrap();

        assert_eq!(existing, vec!["a", "b"]);
        assert!(store.existing_keys("posts", &keys).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryDocumentStore::new();
        store.set_document("accounts", "x-1", json!({})).await.unwrap();

        assert!(store.delete_document("accounts", "x-1").await.unwrap());
        assert!(!store.delete_document("accounts", "x-1").await.unwrap());
        assert!(!store.delete_document("posts", "x-1").await.unwrap());
    }
}
