//! Post store - ordered post records.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::Post;
use crate::errors::AppResult;
use crate::infra::storage::RecordStorage;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Post repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// List every post in insertion order
    async fn list_all(&self) -> AppResult<Vec<Post>>;

    /// Number of stored posts; read failures are returned, not masked
    async fn count(&self) -> AppResult<usize>;

    /// Append a post to the end of the record set
    async fn append(&self, post: Post) -> AppResult<()>;

    /// Remove the post with the given id; `false` if nothing matched
    async fn remove_by_id(&self, id: &str) -> AppResult<bool>;
}

/// Concrete `PostRepository` over a full record set.
pub struct PostStore {
    storage: Arc<dyn RecordStorage<Post>>,
    write_lock: Mutex<()>,
}

impl PostStore {
    pub fn new(storage: Arc<dyn RecordStorage<Post>>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl PostRepository for PostStore {
    async fn list_all(&self) -> AppResult<Vec<Post>> {
        // Lenient read: an unreadable file lists as empty, but is always reported.
        match self.storage.read().await {
            Ok(posts) => Ok(posts),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read post records, serving empty list");
                Ok(Vec::new())
            }
        }
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.storage.read().await?.len())
    }

    async fn append(&self, post: Post) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut posts = self.storage.read().await?;
        posts.push(post);
        self.storage.write(&posts).await?;
        Ok(())
    }

    async fn remove_by_id(&self, id: &str) -> AppResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut posts = self.storage.read().await?;
        let before = posts.len();
        posts.retain(|p| p.id != id);

        if posts.len() == before {
            return Ok(false);
        }

        self.storage.write(&posts).await?;
        Ok(true)
    }
}
