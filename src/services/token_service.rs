//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs. The algorithm is pinned on both sides so a token
//! announcing any other `alg` is rejected.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{Config, TOKEN_TTL_SECONDS};
use crate::domain::User;
use crate::errors::{AppError, AppResult};

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Identity carried by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub username: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            subject_id: claims.sub,
            username: claims.username,
        }
    }
}

/// Signs and verifies session tokens with the server-held secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self::from_secret(config.jwt_secret_bytes())
    }

    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `user` expiring one hour from now.
    pub fn issue(&self, user: &User) -> AppResult<String> {
        self.issue_at(user, Utc::now().timestamp())
    }

    /// Issue a token as if at `issued_at` (unix seconds).
    pub fn issue_at(&self, user: &User, issued_at: i64) -> AppResult<String> {
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            exp: issued_at + TOKEN_TTL_SECONDS,
            iat: issued_at,
        };

        Ok(encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)?)
    }

    /// Verify signature and expiry, returning the embedded identity.
    ///
    /// Any failure (bad signature, malformed, wrong algorithm, expired)
    /// is reported as `Forbidden`.
    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| Identity::from(data.claims))
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Token rejected");
                AppError::Forbidden
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    fn user() -> User {
        User::new("alice".into(), "hash".into())
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = TokenService::from_secret(SECRET);
        let user = user();

        let token = tokens.issue(&user).unwrap();
        let identity = tokens.verify(&token).unwrap();

        assert_eq!(identity.subject_id, user.id);
        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::from_secret(SECRET);
        let issued_at = Utc::now().timestamp() - TOKEN_TTL_SECONDS - 5;

        let token = tokens.issue_at(&user(), issued_at).unwrap();
        assert!(matches!(tokens.verify(&token), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_token_valid_just_before_expiry() {
        let tokens = TokenService::from_secret(SECRET);
        let issued_at = Utc::now().timestamp() - TOKEN_TTL_SECONDS + 60;

        let token = tokens.issue_at(&user(), issued_at).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenService::from_secret(SECRET).issue(&user()).unwrap();
        let other = TokenService::from_secret(b"another-secret-key-of-32-characters!");

        assert!(matches!(other.verify(&token), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = TokenService::from_secret(SECRET);
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "id".into(),
            username: "alice".into(),
            exp: now + 600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(tokens.verify(&token), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = TokenService::from_secret(SECRET);
        assert!(matches!(tokens.verify("not.a.token"), Err(AppError::Forbidden)));
        assert!(matches!(tokens.verify(""), Err(AppError::Forbidden)));
    }

    #[test]
    fn test_expiry_is_one_hour() {
        let tokens = TokenService::from_secret(SECRET);
        let token = tokens.issue_at(&user(), 1_000).unwrap();

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(SECRET), &validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 3600);
    }
}
