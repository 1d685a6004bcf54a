//! Product repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::Product;

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Create a new product repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    #[instrument(skip(self))]
    pub async fn create(&self, name: &str, price: f64, image: &str) -> Result<Product> {
        debug!("creating product: {}", name);

        let result = sqlx::query("INSERT INTO products (name, price, image) VALUES (?, ?, ?)")
            .bind(name)
            .bind(price)
            .bind(image)
            .execute(&self.pool)
            .await
            .context("inserting product")?;

        self.get(result.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow::anyhow!("product not found after creation"))
    }

    /// Get a product by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("fetching product")?;

        Ok(product)
    }

    /// List products with pagination.
    #[instrument(skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, image FROM products ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("listing products")?;

        Ok(products)
    }

    /// Update a product's name and price, and optionally its image.
    ///
    /// Returns the updated product, or `None` if it doesn't exist.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: i64,
        name: &str,
        price: f64,
        image: Option<&str>,
    ) -> Result<Option<Product>> {
        if self.get(id).await?.is_none() {
            return Ok(None);
        }

        match image {
            Some(image) => {
                sqlx::query("UPDATE products SET name = ?, price = ?, image = ? WHERE id = ?")
                    .bind(name)
                    .bind(price)
                    .bind(image)
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .context("updating product")?;
            }
            None => {
                sqlx::query("UPDATE products SET name = ?, price = ? WHERE id = ?")
                    .bind(name)
                    .bind(price)
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .context("updating product")?;
            }
        }

        self.get(id).await
    }

    /// Delete a product. Returns whether a row was removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("deleting product")?;

        Ok(result.rows_affected() > 0)
    }
}
