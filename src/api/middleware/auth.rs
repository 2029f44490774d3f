//! Session token middleware.
//!
//! `NoToken` ends in `Unauthenticated`; a supplied token is verified and
//! ends either in an `Identity` on the request or in `Forbidden`.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::errors::{AppError, AppResult};

/// Token verification middleware.
///
/// Reads the raw token from the `authorization` header, verifies it and
/// injects the resulting `Identity` into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers())?;
    let identity = state.auth_service.verify_token(token)?;

    tracing::debug!(user_id = %identity.subject_id, "Request authenticated");
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// Extract the token from the `authorization` header.
///
/// The header carries the raw token; a `Bearer ` prefix is tolerated.
fn extract_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthenticated)?
        .to_str()
        .map_err(|_| AppError::Forbidden)?
        .trim_start();

    let token = match value.strip_prefix(BEARER_TOKEN_PREFIX.trim_end()) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest,
        _ => value,
    }
    .trim();
    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    Ok(token)
}
