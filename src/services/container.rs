//! Service Container - Centralized service access.
//!
//! Builds every service over one shared unit of work so the HTTP layer
//! only ever sees trait objects.

use std::sync::Arc;

use super::{AuthService, Authenticator, PostManager, PostService, TokenService};
use crate::config::Config;
use crate::infra::Persistence;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get post service
    fn posts(&self) -> Arc<dyn PostService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    post_service: Arc<dyn PostService>,
}

impl Services {
    /// Wire all services over the given persistence and signing configuration
    pub fn from_persistence(uow: Arc<Persistence>, config: &Config) -> Self {
        let tokens = TokenService::new(config);

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), tokens)),
            post_service: Arc::new(PostManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn posts(&self) -> Arc<dyn PostService> {
        self.post_service.clone()
    }
}
