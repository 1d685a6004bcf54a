//! Session service: login, refresh rotation, and logout.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::user::{User, UserRepository};

use super::claims::TokenType;
use super::codec::TokenCodec;
use super::config::AuthConfig;
use super::error::AuthError;
use super::password;

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Registration failures.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("{0}")]
    WeakPassword(String),

    #[error(
        "Invalid username format. Must be 3-50 alphanumeric characters, underscores, or hyphens."
    )]
    InvalidUsername,

    #[error("Username already exists")]
    UsernameTaken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Orchestrates credential verification, jti rotation, and token
/// issuance. The stored jti is rotated on every login, refresh, and
/// logout; rotation is what revokes previously issued tokens.
#[derive(Clone)]
pub struct SessionService {
    users: UserRepository,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl SessionService {
    /// Create a new session service.
    pub fn new(users: UserRepository, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            users,
            codec,
            config,
        }
    }

    /// Register a new user with a complexity-checked password.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<User, RegisterError> {
        if !is_valid_username(username) {
            return Err(RegisterError::InvalidUsername);
        }

        password::validate_complexity(password).map_err(RegisterError::WeakPassword)?;

        if !self.users.is_username_available(username).await? {
            return Err(RegisterError::UsernameTaken);
        }

        let hashed = password::hash(password.to_string()).await?;
        let user = self.users.create(username, &hashed).await?;
        info!(user_id = user.id, username = %user.username, "registered new user");

        Ok(user)
    }

    /// Verify credentials and start a fresh session.
    ///
    /// Overwriting the stored jti here is the revocation point for every
    /// token issued under the previous session.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        // Unknown user and wrong password produce the same error; nothing
        // leaks which one it was.
        let user = self
            .users
            .get_by_username(username)
            .await
            .map_err(internal)?
            .ok_or(AuthError::InvalidCredentials)?;

        let password_ok = password::verify(password.to_string(), user.password_hash.clone())
            .await
            .map_err(internal)?;
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        let jti = new_jti();
        self.users
            .set_current_jti(username, &jti)
            .await
            .map_err(internal)?;

        info!(username, "session started");
        self.issue_pair(username, &jti)
    }

    /// Rotate a refresh token: validate, revoke, and reissue.
    ///
    /// Each refresh token is single-use. Presenting one that was
    /// superseded by a later login, refresh, or logout fails with
    /// `Revoked` even though it has not expired.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.codec.decode(refresh_token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .get_by_username(&claims.sub)
            .await
            .map_err(internal)?
            .ok_or(AuthError::Revoked)?;

        if user.current_jti.as_deref() != Some(claims.jti.as_str()) {
            warn!(username = %claims.sub, "stale refresh token presented");
            return Err(AuthError::Revoked);
        }

        let new_jti = new_jti();
        self.users
            .set_current_jti(&claims.sub, &new_jti)
            .await
            .map_err(internal)?;

        info!(username = %claims.sub, "session rotated");
        self.issue_pair(&claims.sub, &new_jti)
    }

    /// End the session identified by `presented_jti`.
    ///
    /// Rotates the stored jti only if it still equals the presented one;
    /// an already-superseded jti means the session is effectively logged
    /// out, so this is an idempotent no-op. Returns whether a rotation
    /// occurred.
    #[instrument(skip(self, presented_jti))]
    pub async fn logout(&self, username: &str, presented_jti: &str) -> Result<bool, AuthError> {
        let revoked = self
            .users
            .replace_jti_if_current(username, presented_jti, &new_jti())
            .await
            .map_err(internal)?;

        if revoked {
            info!(username, "session ended");
        }

        Ok(revoked)
    }

    fn issue_pair(&self, subject: &str, jti: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.codec.issue(
                subject,
                TokenType::Access,
                jti,
                self.config.access_ttl_minutes,
            )?,
            refresh_token: self.codec.issue(
                subject,
                TokenType::Refresh,
                jti,
                self.config.refresh_ttl_minutes,
            )?,
        })
    }
}

/// Generate a fresh random session identifier.
fn new_jti() -> String {
    Uuid::new_v4().to_string()
}

/// Validate username format.
fn is_valid_username(username: &str) -> bool {
    let len = username.len();
    if !(3..=50).contains(&len) {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn internal(err: anyhow::Error) -> AuthError {
    AuthError::Internal(format!("{err:#}"))
}
