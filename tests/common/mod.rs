//! Test utilities and common setup.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use shopd::api::{self, AppState};
use shopd::auth::{AuthConfig, AuthState, SessionService, TokenCodec};
use shopd::db::Database;
use shopd::order::OrderRepository;
use shopd::product::ProductRepository;
use shopd::upload::ImageStore;
use shopd::user::UserRepository;

/// Minimal but valid PNG header bytes for upload tests.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01";

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

/// Create a test AuthConfig with a JWT secret for testing.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-for-integration-tests-minimum-32-chars".to_string(),
        ..AuthConfig::default()
    }
}

/// Create a test application with all services initialized.
///
/// The returned `TempDir` backs the image store and must outlive the app.
pub async fn test_app() -> (Router, TempDir) {
    let db = Database::in_memory().await.unwrap();
    let media_dir = TempDir::new().unwrap();

    let auth_config = Arc::new(test_auth_config());
    let codec = Arc::new(TokenCodec::new(&auth_config).unwrap());
    let users = UserRepository::new(db.pool().clone());

    let sessions = SessionService::new(users.clone(), codec.clone(), auth_config);
    let auth = AuthState::new(codec, users);
    let products = ProductRepository::new(db.pool().clone());
    let orders = OrderRepository::new(db.pool().clone());
    let images = ImageStore::new(media_dir.path(), 2 * 1024 * 1024);

    let state = AppState::new(sessions, auth, products, orders, images);
    (api::create_router(state), media_dir)
}

/// Send a request and return `(status, parsed JSON body)`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    content_type: Option<&str>,
    body: Body,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

/// POST a JSON body.
pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: &Value,
) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        uri,
        token,
        Some("application/json"),
        Body::from(serde_json::to_vec(body).unwrap()),
    )
    .await
}

/// GET with an optional bearer token.
pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None, Body::empty()).await
}

/// Build a multipart product form body with `name`, `price`, and an
/// optional `image` file part.
pub fn product_form_body(
    name: &str,
    price: &str,
    image: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    for (field, value) in [("name", name), ("price", price)] {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((filename, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Register a user, asserting success.
pub async fn register(app: &Router, username: &str, password: &str) {
    let (status, body) = post_json(
        app,
        "/accounts/new-user",
        None,
        &serde_json::json!({"username": username, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
}

/// Log in and return `(access_token, refresh_token)`.
pub async fn login(app: &Router, username: &str, password: &str) -> (String, String) {
    let (status, body) = post_json(
        app,
        "/accounts/login",
        None,
        &serde_json::json!({"username": username, "password": password}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "unexpected body: {body}");
    assert_eq!(body["token_type"], "bearer");

    (
        body["access_token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}

/// Create a product with a dummy PNG image, returning its id.
pub async fn create_product(app: &Router, token: &str, name: &str, price: &str) -> i64 {
    let (content_type, body) =
        product_form_body(name, price, Some(("item.png", "image/png", PNG_BYTES)));
    let (status, json) = send(
        app,
        Method::POST,
        "/products/create",
        Some(token),
        Some(&content_type),
        Body::from(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {json}");
    json["id"].as_i64().unwrap()
}
