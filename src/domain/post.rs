//! Post domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A blog post. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique post identifier
    #[schema(example = "7d0e8f5a-2b1c-4c8e-9f3a-1a2b3c4d5e6f")]
    pub id: String,
    #[schema(example = "Hello")]
    pub title: String,
    #[schema(example = "First post")]
    pub content: String,
    /// Creation timestamp (RFC 3339, UTC)
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post stamped with a fresh id and the current time.
    pub fn new(title: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: Utc::now(),
        }
    }
}
