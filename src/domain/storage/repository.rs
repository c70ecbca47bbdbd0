//! Document store trait definition

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A stored document: a flat JSON object with canonical field names
pub type Document = serde_json::Value;

/// Narrow interface to the external document store.
///
/// Documents are addressed by collection name and key. Writes are upserts.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Loads a document, `None` if the key is absent
    async fn get_document(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DomainError>;

    /// Creates or replaces a document
    async fn set_document(
        &self,
        collection: &str,
        key: &str,
        document: Document,
    ) -> Result<(), DomainError>;

    /// Returns the subset of `keys` already present, in input order
    async fn existing_keys(
        &self,
        collection: &str,
        keys: &[String],
    ) -> Result<Vec<String>, DomainError>;

    /// Removes a document, returns true if it existed
    async fn delete_document(&self, collection: &str, key: &str) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_mock_document_store() {
        let mut mock = MockDocumentStore::new();

        mock.expect_get_document()
            .with(eq("accounts"), eq("x-1"))
            .returning(|_, _| Ok(Some(serde_json::json!({ "id": "x-1" }))));

        let result = mock.get_document("accounts", "x-1").await.unwrap();
        assert_eq!(result.unwrap()["id"], "x-1");
    }

    #[tokio::test]
    async fn test_mock_document_store_error() {
        let mut mock = MockDocumentStore::new();

        mock.expect_existing_keys()
            .returning(|_, _| Err(DomainError::storage("unavailable")));

        let result = mock.existing_keys("accounts", &["x-1".to_string()]).await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }
}
