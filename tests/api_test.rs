//! Integration tests for API endpoints.
//!
//! The full router runs against in-memory stores; requests are driven
//! through `tower::ServiceExt::oneshot`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use postboard::api::create_router;
use postboard::config::Config;
use postboard::domain::User;
use postboard::services::{Claims, TokenService};
use postboard::AppState;

const SECRET: &str = "test-secret-key-for-testing-only-32chars";

// =============================================================================
// Test Helpers
// =============================================================================

fn test_config() -> Config {
    Config::new(SECRET, "unused", "127.0.0.1", 0).expect("valid test config")
}

fn test_app() -> Router {
    create_router(AppState::in_memory(&test_config()))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let credentials = json!({ "username": username, "password": password });

    let (status, _) = send(app, Method::POST, "/api/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, Method::POST, "/api/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token in login response").to_string()
}

// =============================================================================
// End-to-end Flow
// =============================================================================

#[tokio::test]
async fn test_full_post_lifecycle() {
    let app = test_app();
    let credentials = json!({ "username": "alice", "password": "secret1" });

    let (status, user) = send(&app, Method::POST, "/api/register", None, Some(credentials.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(user["username"], "alice");
    assert!(user["id"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());

    let (status, login) = send(&app, Method::POST, "/api/login", None, Some(credentials)).await;
    assert_eq!(status, StatusCode::OK);
    let token = login["token"].as_str().unwrap().to_string();

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "INVALID_CREDENTIALS");

    let (status, post) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "t", "content": "c" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let post_id = post["id"].as_str().expect("generated id").to_string();
    assert_eq!(post["title"], "t");
    assert_eq!(post["content"], "c");
    assert!(post["createdAt"].is_string());

    let (status, posts) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let posts = posts.as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], post_id.as_str());

    let uri = format!("/api/posts/{}", post_id);
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, posts) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(posts.as_array().unwrap().is_empty());

    let (status, error) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_posts_listed_in_insertion_order() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    for title in ["first", "second", "third"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(&token),
            Some(json!({ "title": title, "content": "body" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, posts) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
    let titles: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["first", "second", "third"]);
}

// =============================================================================
// Registration & Login
// =============================================================================

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = test_app();
    let credentials = json!({ "username": "alice", "password": "secret1" });

    let (first, _) = send(&app, Method::POST, "/api/register", None, Some(credentials.clone())).await;
    let (second, error) = send(&app, Method::POST, "/api/register", None, Some(credentials)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "DUPLICATE_USERNAME");
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = test_app();

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(error["error"]["message"], "Username and password are required");
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_are_identical() {
    let app = test_app();
    register_and_login(&app, "alice", "secret1").await;

    let wrong_password = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "alice", "password": "nope" })),
    )
    .await;
    let unknown_user = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "bob", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_password, unknown_user);
}

// =============================================================================
// Token Gate
// =============================================================================

#[tokio::test]
async fn test_posts_require_token() {
    let app = test_app();

    let (status, error) = send(&app, Method::GET, "/api/posts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["error"]["code"], "UNAUTHENTICATED");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/posts",
        None,
        Some(json!({ "title": "t", "content": "c" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_forbidden() {
    let app = test_app();

    let (status, error) = send(&app, Method::GET, "/api/posts", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_expired_token_is_forbidden() {
    let app = test_app();
    let user = User::new("alice".into(), "hash".into());
    let long_ago = Utc::now().timestamp() - 2 * 3600;

    let token = TokenService::from_secret(SECRET.as_bytes())
        .issue_at(&user, long_ago)
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_forbidden() {
    let app = test_app();
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: "someone".into(),
        username: "mallory".into(),
        exp: now + 3600,
        iat: now,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"not-the-server-secret-but-32-chars"),
    )
    .unwrap();

    let (status, _) = send(&app, Method::GET, "/api/posts", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bearer_prefix_is_tolerated() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let bearer = format!("Bearer {}", token);
    let (status, _) = send(&app, Method::GET, "/api/posts", Some(&bearer), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bare_bearer_prefix_is_unauthenticated() {
    let app = test_app();

    let (status, error) = send(&app, Method::GET, "/api/posts", Some("Bearer "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["error"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
async fn test_create_post_missing_fields() {
    let app = test_app();
    let token = register_and_login(&app, "alice", "secret1").await;

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/posts",
        Some(&token),
        Some(json!({ "title": "only a title" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["message"], "Title and content are required");
}

// =============================================================================
// Ambient Endpoints
// =============================================================================

#[tokio::test]
async fn test_health_reports_store_counts() {
    let app = test_app();
    register_and_login(&app, "alice", "secret1").await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["stores"]["users"]["records"], 1);
    assert_eq!(body["stores"]["posts"]["records"], 0);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/posts"].is_object());
}
