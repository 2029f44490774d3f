//! Post handlers. All routes sit behind the token middleware.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::Post;
use crate::errors::AppResult;
use crate::services::Identity;

/// New post request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Title and content are required"))]
    #[schema(example = "t")]
    pub title: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Title and content are required"))]
    #[schema(example = "c")]
    pub content: String,
}

/// Create post routes
pub fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", delete(delete_post))
}

/// List all posts
#[utoipa::path(
    get,
    path = "/api/posts",
    tag = "Posts",
    security(("token_auth" = [])),
    responses(
        (status = 200, description = "All posts in insertion order", body = Vec<Post>),
        (status = 401, description = "No token supplied"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<Post>>> {
    let posts = state.post_service.list_posts().await?;
    Ok(Json(posts))
}

/// Create a post
#[utoipa::path(
    post,
    path = "/api/posts",
    tag = "Posts",
    security(("token_auth" = [])),
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = Post),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "No token supplied"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<Post>)> {
    tracing::debug!(user = %identity.username, "Creating post");
    let post = state
        .post_service
        .create_post(payload.title, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// Delete a post
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    tag = "Posts",
    security(("token_auth" = [])),
    params(("id" = String, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "Post not found"),
        (status = 401, description = "No token supplied"),
        (status = 403, description = "Invalid or expired token")
    )
)]
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    tracing::debug!(user = %identity.username, post_id = %id, "Deleting post");
    state.post_service.delete_post(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
