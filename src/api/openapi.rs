//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, post_handler};
use crate::domain::{Post, UserResponse};
use crate::services::TokenResponse;

/// OpenAPI documentation for Postboard
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Postboard",
        version = "0.1.0",
        description = "Minimal blogging API backed by flat JSON record files",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:4000", description = "Local development server")
    ),
    paths(
        auth_handler::register,
        auth_handler::login,
        post_handler::list_posts,
        post_handler::create_post,
        post_handler::delete_post,
    ),
    components(
        schemas(
            Post,
            UserResponse,
            TokenResponse,
            auth_handler::CredentialsRequest,
            post_handler::CreatePostRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "User registration and login"),
        (name = "Posts", description = "Post listing, creation and deletion")
    )
)]
pub struct ApiDoc;

/// Security scheme: raw session token in the `authorization` header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token_auth",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "authorization",
                    "Session token obtained from /api/login",
                ))),
            );
        }
    }
}
