//! User repository for database operations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user from a username and an already-hashed password.
    #[instrument(skip(self, password_hash))]
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User> {
        debug!("creating user: {}", username);

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .context("inserting user")?;

        self.get_by_username(username)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user not found after creation"))
    }

    /// Get a user by username.
    #[instrument(skip(self))]
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, current_jti, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("fetching user by username")?;

        Ok(user)
    }

    /// Unconditionally overwrite the user's current jti.
    ///
    /// This single row update is the revocation point: once it commits,
    /// every token minted under the previous jti is dead. Concurrent
    /// writers for the same user serialize here; last writer wins.
    #[instrument(skip(self, new_jti))]
    pub async fn set_current_jti(&self, username: &str, new_jti: &str) -> Result<()> {
        let result = sqlx::query("UPDATE users SET current_jti = ? WHERE username = ?")
            .bind(new_jti)
            .bind(username)
            .execute(&self.pool)
            .await
            .context("updating current jti")?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("user not found: {}", username));
        }

        Ok(())
    }

    /// Overwrite the current jti only if it still equals `expected`.
    ///
    /// Compare-and-overwrite in one statement, used by logout so that a
    /// stale (already superseded) jti is a no-op. Returns whether the
    /// rotation happened.
    #[instrument(skip(self, expected, new_jti))]
    pub async fn replace_jti_if_current(
        &self,
        username: &str,
        expected: &str,
        new_jti: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE users SET current_jti = ? WHERE username = ? AND current_jti = ?",
        )
        .bind(new_jti)
        .bind(username)
        .bind(expected)
        .execute(&self.pool)
        .await
        .context("rotating current jti")?;

        Ok(result.rows_affected() == 1)
    }

    /// Check if a username is available.
    #[instrument(skip(self))]
    pub async fn is_username_available(&self, username: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .context("checking username availability")?;

        Ok(count.0 == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    async fn test_repo() -> UserRepository {
        let db = Database::in_memory().await.unwrap();
        UserRepository::new(db.pool().clone())
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = test_repo().await;

        let user = repo.create("alice", "hash").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.password_hash, "hash");
        assert_eq!(user.current_jti, None);

        let fetched = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);

        assert!(repo.get_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = test_repo().await;
        repo.create("alice", "hash").await.unwrap();
        assert!(repo.create("alice", "other").await.is_err());
    }

    #[tokio::test]
    async fn test_username_availability() {
        let repo = test_repo().await;
        assert!(repo.is_username_available("alice").await.unwrap());
        repo.create("alice", "hash").await.unwrap();
        assert!(!repo.is_username_available("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_set_current_jti() {
        let repo = test_repo().await;
        repo.create("alice", "hash").await.unwrap();

        repo.set_current_jti("alice", "jti-1").await.unwrap();
        let user = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.current_jti.as_deref(), Some("jti-1"));

        repo.set_current_jti("alice", "jti-2").await.unwrap();
        let user = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.current_jti.as_deref(), Some("jti-2"));

        assert!(repo.set_current_jti("ghost", "jti").await.is_err());
    }

    #[tokio::test]
    async fn test_replace_jti_if_current() {
        let repo = test_repo().await;
        repo.create("alice", "hash").await.unwrap();
        repo.set_current_jti("alice", "jti-1").await.unwrap();

        // Matching jti rotates.
        assert!(repo
            .replace_jti_if_current("alice", "jti-1", "jti-2")
            .await
            .unwrap());

        // Stale jti is a no-op.
        assert!(!repo
            .replace_jti_if_current("alice", "jti-1", "jti-3")
            .await
            .unwrap());

        let user = repo.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(user.current_jti.as_deref(), Some("jti-2"));
    }
}
