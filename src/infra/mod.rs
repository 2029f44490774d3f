//! Infrastructure layer - External systems integration
//!
//! This module handles all persistence concerns:
//! - Record set storage (JSON files, in-memory)
//! - Repositories for users and posts
//! - Unit of Work owning both stores

pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use repositories::{PostRepository, PostStore, UserRepository, UserStore};
pub use storage::{JsonFileStorage, MemoryStorage, RecordStorage};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockPostRepository, MockUserRepository};
