//! Order handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use crate::order::{OrderCreate, OrderDetails};

use super::super::error::{ApiError, ApiResult};
use super::super::state::AppState;

/// Create an order linking a user to products.
#[instrument(skip(state, request), fields(user_id = request.user_id))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderCreate>,
) -> ApiResult<(StatusCode, Json<OrderDetails>)> {
    let order = state.orders.create(&request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Get an order with embedded product details.
#[instrument(skip(state))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i64>,
) -> ApiResult<Json<OrderDetails>> {
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;

    Ok(Json(order))
}
