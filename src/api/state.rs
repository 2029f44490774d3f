//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Persistence, UnitOfWork};
use crate::services::{AuthService, PostService, ServiceContainer, Services};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service (register, login, token verification)
    pub auth_service: Arc<dyn AuthService>,
    /// Post service
    pub post_service: Arc<dyn PostService>,
    /// Record stores, used by the health check
    pub persistence: Arc<dyn UnitOfWork>,
}

impl AppState {
    /// Create application state over the record files named by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_persistence(Persistence::from_config(config), config)
    }

    /// Create application state over in-memory stores.
    pub fn in_memory(config: &Config) -> Self {
        Self::with_persistence(Persistence::in_memory(), config)
    }

    /// Create application state over the given stores.
    pub fn with_persistence(persistence: Persistence, config: &Config) -> Self {
        let persistence = Arc::new(persistence);
        let container = Services::from_persistence(persistence.clone(), config);

        Self {
            auth_service: container.auth(),
            post_service: container.posts(),
            persistence,
        }
    }
}
