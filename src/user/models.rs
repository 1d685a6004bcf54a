//! User data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User entity from the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// The single currently-valid session epoch for this user. `None`
    /// only before the first login. Any token carrying a different jti is
    /// permanently invalid, even if unexpired.
    #[serde(skip_serializing)]
    pub current_jti: Option<String>,
    pub created_at: String,
}
