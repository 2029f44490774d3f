//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::services::TokenResponse;

/// Credentials submitted to register or log in.
///
/// Missing fields deserialize as empty and fail validation.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Username and password are required"))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Missing fields or duplicate username")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(payload.username, payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Login and get a session token
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Missing fields or invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CredentialsRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(token))
}
