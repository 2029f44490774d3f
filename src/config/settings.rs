//! Application settings loaded from environment variables.

use std::env;
use std::path::{Path, PathBuf};

use super::constants::{
    DEFAULT_DATA_DIR, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, MIN_JWT_SECRET_LENGTH,
    POSTS_FILE_NAME, USERS_FILE_NAME,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    jwt_secret: String,
    pub data_dir: PathBuf,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"[REDACTED]")
            .field("data_dir", &self.data_dir)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration from explicit values.
    ///
    /// # Errors
    /// Returns a configuration error if the secret is shorter than
    /// `MIN_JWT_SECRET_LENGTH`.
    pub fn new(
        jwt_secret: impl Into<String>,
        data_dir: impl Into<PathBuf>,
        server_host: impl Into<String>,
        server_port: u16,
    ) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::configuration(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }

        Ok(Self {
            jwt_secret,
            data_dir: data_dir.into(),
            server_host: server_host.into(),
            server_port,
        })
    }

    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// `JWT_SECRET` is required; there is no fallback signing secret.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::configuration("JWT_SECRET environment variable must be set"))?;

        let server_port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SERVER_PORT);

        Self::new(
            jwt_secret,
            env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port,
        )
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Path of the user record file.
    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE_NAME)
    }

    /// Path of the post record file.
    pub fn posts_file(&self) -> PathBuf {
        self.data_dir.join(POSTS_FILE_NAME)
    }

    /// Override the data directory (CLI flag).
    pub fn with_data_dir(mut self, data_dir: impl AsRef<Path>) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
