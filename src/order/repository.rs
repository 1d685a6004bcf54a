//! Order repository for database operations.

use anyhow::Context;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, instrument};

use super::models::{OrderCreate, OrderDetails, OrderItemDetail, ProductSummary};

/// Order persistence failures.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Product with id {0} not found")]
    ProductNotFound(i64),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Create a new order repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an order with its items in one transaction.
    ///
    /// Fails without side effects when any referenced product is missing.
    #[instrument(skip(self, order))]
    pub async fn create(&self, order: &OrderCreate) -> Result<OrderDetails, OrderError> {
        let mut tx = self.pool.begin().await.context("starting transaction")?;

        let result = sqlx::query("INSERT INTO orders (user_id) VALUES (?)")
            .bind(order.user_id)
            .execute(&mut *tx)
            .await
            .context("inserting order")?;
        let order_id = result.last_insert_rowid();

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let product: Option<(i64, String, f64)> =
                sqlx::query_as("SELECT id, name, price FROM products WHERE id = ?")
                    .bind(item.product_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .context("fetching product for order item")?;

            let Some((id, name, price)) = product else {
                return Err(OrderError::ProductNotFound(item.product_id));
            };

            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES (?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .context("inserting order item")?;

            items.push(OrderItemDetail {
                product: ProductSummary { id, name, price },
                quantity: item.quantity,
            });
        }

        tx.commit().await.context("committing order")?;
        debug!(order_id, "created order");

        Ok(OrderDetails {
            id: order_id,
            user_id: order.user_id,
            items,
        })
    }

    /// Get an order with its items and product details.
    #[instrument(skip(self))]
    pub async fn get(&self, order_id: i64) -> Result<Option<OrderDetails>, OrderError> {
        let order: Option<(i64, i64)> =
            sqlx::query_as("SELECT id, user_id FROM orders WHERE id = ?")
                .bind(order_id)
                .fetch_optional(&self.pool)
                .await
                .context("fetching order")?;

        let Some((id, user_id)) = order else {
            return Ok(None);
        };

        let rows: Vec<(i64, String, f64, i64)> = sqlx::query_as(
            r#"
            SELECT p.id, p.name, p.price, oi.quantity
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ?
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .context("fetching order items")?;

        let items = rows
            .into_iter()
            .map(|(id, name, price, quantity)| OrderItemDetail {
                product: ProductSummary { id, name, price },
                quantity,
            })
            .collect();

        Ok(Some(OrderDetails { id, user_id, items }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::order::OrderItemCreate;
    use crate::product::ProductRepository;

    async fn test_repos() -> (OrderRepository, ProductRepository) {
        let db = Database::in_memory().await.unwrap();
        (
            OrderRepository::new(db.pool().clone()),
            ProductRepository::new(db.pool().clone()),
        )
    }

    #[tokio::test]
    async fn test_create_and_get_order() {
        let (orders, products) = test_repos().await;
        let widget = products
            .create("Widget", 19.99, "/static/images/w.png")
            .await
            .unwrap();

        let created = orders
            .create(&OrderCreate {
                user_id: 1,
                items: vec![OrderItemCreate {
                    product_id: widget.id,
                    quantity: 2,
                }],
            })
            .await
            .unwrap();

        assert_eq!(created.user_id, 1);
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].quantity, 2);
        assert_eq!(created.items[0].product.name, "Widget");

        let fetched = orders.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].product.price, 19.99);
    }

    #[tokio::test]
    async fn test_create_order_unknown_product() {
        let (orders, _products) = test_repos().await;

        let err = orders
            .create(&OrderCreate {
                user_id: 1,
                items: vec![OrderItemCreate {
                    product_id: 42,
                    quantity: 1,
                }],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ProductNotFound(42)));
    }

    #[tokio::test]
    async fn test_get_missing_order() {
        let (orders, _products) = test_repos().await;
        assert!(orders.get(123).await.unwrap().is_none());
    }
}
