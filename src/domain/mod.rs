//! Domain layer - Core business entities
//!
//! Records owned by the two stores plus the password value object.

pub mod password;
pub mod post;
pub mod user;

pub use password::Password;
pub use post::Post;
pub use user::{User, UserResponse};
