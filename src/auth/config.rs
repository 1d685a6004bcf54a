//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Immutable signing and lifetime configuration.
///
/// Constructed once at process start (from `Settings`) and passed by
/// reference into the token codec and session service; never ambient
/// global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret.
    pub jwt_secret: String,

    /// Signing algorithm name (e.g. "HS256").
    pub jwt_algorithm: String,

    /// Access token lifetime in minutes. `None` issues access tokens
    /// without an `exp` claim, i.e. they never expire.
    pub access_ttl_minutes: Option<i64>,

    /// Refresh token lifetime in minutes. `None` means non-expiring
    /// refresh tokens; the default is 7 days.
    pub refresh_ttl_minutes: Option<i64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "insecure-dev-secret-change-me".to_string(),
            jwt_algorithm: "HS256".to_string(),
            access_ttl_minutes: Some(10),
            refresh_ttl_minutes: Some(60 * 24 * 7),
        }
    }
}
