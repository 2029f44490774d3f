//! Post service - list, create and delete posts.
//!
//! Every caller is already authenticated; posts have no owner, so any
//! identity may touch any post.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::MSG_POST_FIELDS_REQUIRED;
use crate::domain::Post;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Post service trait for dependency injection.
#[async_trait]
pub trait PostService: Send + Sync {
    /// List all posts in insertion order
    async fn list_posts(&self) -> AppResult<Vec<Post>>;

    /// Create and persist a new post
    async fn create_post(&self, title: String, content: String) -> AppResult<Post>;

    /// Delete a post by id
    async fn delete_post(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of PostService using Unit of Work.
pub struct PostManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PostManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> PostService for PostManager<U> {
    async fn list_posts(&self) -> AppResult<Vec<Post>> {
        self.uow.posts().list_all().await
    }

    async fn create_post(&self, title: String, content: String) -> AppResult<Post> {
        if title.is_empty() || content.is_empty() {
            return Err(AppError::validation(MSG_POST_FIELDS_REQUIRED));
        }

        let post = Post::new(title, content);
        self.uow.posts().append(post.clone()).await?;

        tracing::info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    async fn delete_post(&self, id: &str) -> AppResult<()> {
        if !self.uow.posts().remove_by_id(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }
}
