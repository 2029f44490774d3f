//! Postboard - a minimal blogging API over flat JSON record files.
//!
//! Users register and log in to receive a signed, one-hour session token;
//! with it they can list, add and delete posts.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, posts and password hashing
//! - **services**: Registration, login, token verification, post use cases
//! - **infra**: Record storage and the credential/post stores
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! JWT_SECRET=... cargo run -- serve --port 4000 --data-dir data
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, Post, User};
pub use errors::{AppError, AppResult};
