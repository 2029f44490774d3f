//! Credential store - user records with unique usernames.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::User;
use crate::errors::{AppError, AppResult};
use crate::infra::storage::RecordStorage;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by exact username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Create a new user; fails with `DuplicateUsername` if the name is taken
    async fn create(&self, username: String, password_hash: String) -> AppResult<User>;

    /// List every user in insertion order
    async fn list(&self) -> AppResult<Vec<User>>;
}

/// Concrete `UserRepository` over a full record set.
pub struct UserStore {
    storage: Arc<dyn RecordStorage<User>>,
    write_lock: Mutex<()>,
}

impl UserStore {
    pub fn new(storage: Arc<dyn RecordStorage<User>>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.storage.read().await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn create(&self, username: String, password_hash: String) -> AppResult<User> {
        // Uniqueness check and write must not interleave with another create.
        let _guard = self.write_lock.lock().await;

        let mut users = self.storage.read().await?;
        if users.iter().any(|u| u.username == username) {
            return Err(AppError::DuplicateUsername);
        }

        let user = User::new(username, password_hash);
        users.push(user.clone());
        self.storage.write(&users).await?;

        tracing::debug!(user_id = %user.id, total = users.len(), "User record appended");
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.storage.read().await?)
    }
}
