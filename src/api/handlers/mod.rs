//! API request handlers.

pub mod accounts;
pub mod orders;
pub mod products;

use axum::Json;
use serde_json::{Value, json};

/// Health check endpoint.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
