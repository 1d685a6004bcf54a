//! Order module: orders linking users to products.

mod models;
mod repository;

pub use models::{OrderCreate, OrderDetails, OrderItemCreate, OrderItemDetail, ProductSummary};
pub use repository::{OrderError, OrderRepository};
