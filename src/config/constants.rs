//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Authentication & Security
// =============================================================================

/// Session token lifetime in seconds (fixed at one hour)
pub const TOKEN_TTL_SECONDS: i64 = 3600;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Optional prefix tolerated on the authorization header
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Token type reported in login responses
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 4000;

// =============================================================================
// Persistence
// =============================================================================

/// Default directory holding the record files
pub const DEFAULT_DATA_DIR: &str = "data";

/// Record file for users, relative to the data directory
pub const USERS_FILE_NAME: &str = "users.json";

/// Record file for posts, relative to the data directory
pub const POSTS_FILE_NAME: &str = "posts.json";

// =============================================================================
// Validation messages
// =============================================================================

pub const MSG_CREDENTIALS_REQUIRED: &str = "Username and password are required";

pub const MSG_POST_FIELDS_REQUIRED: &str = "Title and content are required";
