//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, post_routes};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes
        .nest("/api", auth_routes())
        // Protected post routes (require a valid session token)
        .nest(
            "/api/posts",
            post_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to Postboard"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    stores: StoreHealth,
}

#[derive(Serialize)]
struct StoreHealth {
    users: StoreStatus,
    posts: StoreStatus,
}

#[derive(Serialize)]
struct StoreStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl StoreStatus {
    fn from_count(result: crate::errors::AppResult<usize>) -> Self {
        match result {
            Ok(records) => Self {
                status: "healthy",
                records: Some(records),
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                records: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Health check endpoint reading both record sets
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let users = StoreStatus::from_count(state.persistence.users().list().await.map(|u| u.len()));
    let posts = StoreStatus::from_count(state.persistence.posts().count().await);

    let all_healthy = users.status == "healthy" && posts.status == "healthy";

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        stores: StoreHealth { users, posts },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
