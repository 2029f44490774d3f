//! Authentication service - registration and login.
//!
//! Mediates access to the credential store; password hashing lives in
//! the domain `Password` value object and token handling in `TokenService`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use super::token_service::{Identity, TokenService};
use crate::config::{MSG_CREDENTIALS_REQUIRED, TOKEN_TTL_SECONDS, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Hash verified for unknown usernames so both login failures cost the same.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("postboard-dummy-password").ok());

/// Token response returned after successful authentication
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Signed session token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, username: String, password: String) -> AppResult<User>;

    /// Login and return a session token
    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse>;

    /// Verify a session token and extract the identity it carries
    fn verify_token(&self, token: &str) -> AppResult<Identity>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: TokenService,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, tokens: TokenService) -> Self {
        Self { uow, tokens }
    }
}

/// Both fields must be present; a whitespace-only username counts as missing.
fn require_credentials(username: &str, password: &str) -> AppResult<()> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::validation(MSG_CREDENTIALS_REQUIRED));
    }
    Ok(())
}

/// Hash on the blocking pool so Argon2 does not stall request handling.
async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || Password::new(&password).map(Password::into_string))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))?
}

/// Verify on the blocking pool. Without a stored hash the dummy hash is
/// checked instead and the result is always `false`.
async fn verify_password(stored_hash: Option<String>, password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => Password::from_hash(hash).verify(&password),
        None => {
            if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                dummy.verify(&password);
            }
            false
        }
    })
    .await
    .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, username: String, password: String) -> AppResult<User> {
        require_credentials(&username, &password)?;

        // Cheap pre-check before hashing; the store re-checks under its lock.
        if self.uow.users().find_by_username(&username).await?.is_some() {
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = hash_password(password).await?;
        let user = self.uow.users().create(username, password_hash).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AppResult<TokenResponse> {
        require_credentials(&username, &password)?;

        let user = self.uow.users().find_by_username(&username).await?;
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = verify_password(stored_hash, password).await?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::info!(username = %username, "Login rejected");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "Login succeeded");

        Ok(TokenResponse {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: TOKEN_TTL_SECONDS,
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Identity> {
        self.tokens.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockPostRepository, MockUserRepository, Persistence};

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn service(users: MockUserRepository) -> Authenticator<Persistence> {
        let uow = Persistence::new(Arc::new(users), Arc::new(MockPostRepository::new()));
        Authenticator::new(Arc::new(uow), TokenService::from_secret(SECRET))
    }

    fn in_memory() -> Authenticator<Persistence> {
        Authenticator::new(
            Arc::new(Persistence::in_memory()),
            TokenService::from_secret(SECRET),
        )
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();
        users.expect_create().never();
        let service = service(users);

        let empty_name = service.register("".into(), "secret1".into()).await;
        let blank_name = service.register("   ".into(), "secret1".into()).await;
        let empty_pass = service.register("alice".into(), "".into()).await;

        assert!(matches!(empty_name, Err(AppError::Validation(_))));
        assert!(matches!(blank_name, Err(AppError::Validation(_))));
        assert!(matches!(empty_pass, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_rejects_blank_username_like_register() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().never();
        let service = service(users);

        let result = service.login("   ".into(), "secret1".into()).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_the_runtime() {
        let service = Arc::new(in_memory());

        let ticks = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let ticker = {
            let ticks = ticks.clone();
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    tokio::task::yield_now().await;
                }
            })
        };

        service.register("alice".into(), "secret1".into()).await.unwrap();
        service.login("alice".into(), "secret1".into()).await.unwrap();
        ticker.abort();

        assert!(ticks.load(std::sync::atomic::Ordering::SeqCst) > 0);
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|name, hash| name == "alice" && hash != "secret1" && hash.starts_with("$argon2"))
            .times(1)
            .returning(|name, hash| Ok(User::new(name, hash)));

        let user = service(users)
            .register("alice".into(), "secret1".into())
            .await
            .unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let service = in_memory();
        service.register("alice".into(), "secret1".into()).await.unwrap();

        let second = service.register("alice".into(), "other".into()).await;
        assert!(matches!(second, Err(AppError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let service = in_memory();
        let user = service.register("alice".into(), "secret1".into()).await.unwrap();

        let response = service.login("alice".into(), "secret1".into()).await.unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 3600);

        let identity = service.verify_token(&response.token).unwrap();
        assert_eq!(identity.subject_id, user.id);
        assert_eq!(identity.username, "alice");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let service = in_memory();
        service.register("alice".into(), "secret1".into()).await.unwrap();

        let wrong_password = service.login("alice".into(), "wrong".into()).await.unwrap_err();
        let unknown_user = service.login("mallory".into(), "secret1".into()).await.unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidCredentials));
        assert!(matches!(unknown_user, AppError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert_eq!(wrong_password.code(), unknown_user.code());
    }

    #[tokio::test]
    async fn test_login_propagates_storage_failure() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().returning(|_| {
            Err(crate::errors::StorageError::from(std::io::Error::other("disk gone")).into())
        });

        let result = service(users).login("alice".into(), "secret1".into()).await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
