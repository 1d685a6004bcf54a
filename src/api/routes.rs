//! API route definitions.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::auth_middleware;

use super::handlers;
use super::handlers::{accounts, orders, products};
use super::state::AppState;

// Multipart bodies can exceed the image cap slightly (boundaries, other
// fields); the ImageStore enforces the real limit with a 400.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .allow_origin(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let auth_state = state.auth.clone();

    // Every protected route passes the access guard: the presented
    // access token is checked against the store's current jti.
    let protected_routes = Router::new()
        .route("/accounts/logout", post(accounts::logout))
        .route("/products/", get(products::list_products))
        .route("/products/{product_id}", get(products::get_product))
        .route("/products/create", post(products::create_product))
        .route("/products/update/{product_id}", put(products::update_product))
        .route(
            "/products/delete/{product_id}",
            delete(products::delete_product),
        )
        .route("/orders/create", post(orders::create_order))
        .route("/orders/{order_id}", get(orders::get_order))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/accounts/new-user", post(accounts::register))
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/refresh", post(accounts::refresh));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/static", ServeDir::new(state.images.static_root()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
