//! Product data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Product entity from the database.
///
/// `image` holds the stored image URL; list and detail responses replace
/// it with an inline base64 data URI before serializing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductList {
    pub products: Vec<Product>,
}
