//! Post service - bulk import of an account's posts

use tracing::{debug, info};

use crate::domain::storage::GeneratedKey;
use crate::domain::{DomainError, Post};
use crate::infrastructure::storage::DocumentClient;

#[derive(Debug, Clone)]
pub struct PostService {
    client: DocumentClient,
}

impl PostService {
    pub fn new(client: DocumentClient) -> Self {
        Self { client }
    }

    /// Saves posts for an account and returns the ones stored.
    ///
    /// Every post is attributed to `account_id` and stored under a fresh
    /// UUID; a UUID carried in by the caller is replaced, so an import never
    /// writes over an existing post. Posts that fail to save are logged and
    /// left out of the result.
    pub async fn import(&self, account_id: &str, posts: Vec<Post>) -> Vec<Post> {
        let total = posts.len();

        let posts: Vec<Post> = posts
            .into_iter()
            .map(|mut post| {
                if !post.uuid.is_empty() {
                    debug!(account_id = %account_id, uuid = %post.uuid, "Replacing imported post key");
                }
                post.id = account_id.to_string();
                post
            })
            .collect();

        let saved = self.client.save_all(posts, &GeneratedKey).await;

        info!(
            account_id = %account_id,
            saved = saved.len(),
            total,
            "Imported posts"
        );
        saved
    }

    pub async fn get(&self, uuid: &str) -> Result<Option<Post>, DomainError> {
        self.client.load(uuid).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::infrastructure::storage::InMemoryDocumentStore;

    fn service() -> (PostService, Arc<InMemoryDocumentStore>) {
        let store = Arc::new(InMemoryDocumentStore::new());
        (PostService::new(DocumentClient::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_import_assigns_keys_and_owner() {
        let (service, store) = service();

        let posts = vec![Post::new("someone-else", "first"), Post::new("", "second")];

        let saved = service.import("x-1", posts).await;

        assert_eq!(saved.len(), 2);
        assert_eq!(store.len("posts"), 2);
        assert!(saved.iter().all(|p| p.id == "x-1"));
        assert!(saved.iter().all(|p| p.created_at().is_some()));
        assert_ne!(saved[0].uuid, saved[1].uuid);

        let first = &saved[0];
        assert_eq!(service.get(&first.uuid).await.unwrap().as_ref(), Some(first));
    }

    #[tokio::test]
    async fn test_import_cannot_overwrite_another_accounts_post() {
        let (service, store) = service();

        let original = service.import("x-1", vec![Post::new("", "x-1 text")]).await;
        let target = original[0].uuid.clone();

        let mut forged = Post::new("", "x-2 text");
        forged.uuid = target.clone();
        let imported = service.import("x-2", vec![forged]).await;

        assert_ne!(imported[0].uuid, target);
        assert_eq!(store.len("posts"), 2);

        let kept = service.get(&target).await.unwrap().unwrap();
        assert_eq!(kept.id, "x-1");
        assert_eq!(kept.text, "x-1 text");
    }

    #[tokio::test]
    async fn test_import_empty() {
        let (service, _) = service();

        assert!(service.import("x-1", Vec::new()).await.is_empty());
    }
}
