//! Order data models.

use serde::{Deserialize, Serialize};

/// One line of an order creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemCreate {
    pub product_id: i64,
    pub quantity: i64,
}

/// Order creation request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub user_id: i64,
    pub items: Vec<OrderItemCreate>,
}

/// Product details embedded in an order response.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

/// One line of an order response.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    pub product: ProductSummary,
    pub quantity: i64,
}

/// Fully assembled order, ready to cross the persistence boundary.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<OrderItemDetail>,
}
