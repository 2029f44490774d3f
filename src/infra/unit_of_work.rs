//! Unit of Work - centralized access to both record stores.
//!
//! Flat files have no transactions, so the unit of work only owns the
//! stores and decides where their record sets live.

use std::sync::Arc;

use super::repositories::{PostRepository, PostStore, UserRepository, UserStore};
use super::storage::{JsonFileStorage, MemoryStorage};
use crate::config::Config;
use crate::domain::{Post, User};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get the credential store
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get the post store
    fn posts(&self) -> Arc<dyn PostRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<dyn UserRepository>,
    post_repo: Arc<dyn PostRepository>,
}

impl Persistence {
    /// Create from already-built repositories
    pub fn new(user_repo: Arc<dyn UserRepository>, post_repo: Arc<dyn PostRepository>) -> Self {
        Self {
            user_repo,
            post_repo,
        }
    }

    /// Stores backed by the JSON record files under the configured data directory
    pub fn from_config(config: &Config) -> Self {
        let users_file = config.users_file();
        let posts_file = config.posts_file();
        tracing::info!(
            users = %users_file.display(),
            posts = %posts_file.display(),
            "Using record files"
        );

        Self::new(
            Arc::new(UserStore::new(Arc::new(JsonFileStorage::<User>::new(users_file)))),
            Arc::new(PostStore::new(Arc::new(JsonFileStorage::<Post>::new(posts_file)))),
        )
    }

    /// Stores held entirely in memory
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(UserStore::new(Arc::new(MemoryStorage::<User>::new()))),
            Arc::new(PostStore::new(Arc::new(MemoryStorage::<Post>::new()))),
        )
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn posts(&self) -> Arc<dyn PostRepository> {
        self.post_repo.clone()
    }
}
