//! Product catalog module.

mod models;
mod repository;

pub use models::{Product, ProductList};
pub use repository::ProductRepository;
