//! Access guard middleware.
//!
//! Validates a presented token against the credential store's current jti
//! on every protected request. This per-request check is what makes
//! logout and rotation actually revoke access instead of merely issuing
//! advisory new tokens.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::user::UserRepository;

use super::claims::{Claims, TokenType};
use super::codec::TokenCodec;
use super::error::AuthError;

/// Extract a Bearer token from an Authorization header value.
fn bearer_token_from_header(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    let token = parts.next().ok_or(AuthError::InvalidAuthHeader)?;
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    if parts.next().is_some() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token)
}

/// Access guard state shared across protected routes.
#[derive(Clone)]
pub struct AuthState {
    codec: Arc<TokenCodec>,
    users: UserRepository,
}

impl AuthState {
    /// Create new guard state.
    pub fn new(codec: Arc<TokenCodec>, users: UserRepository) -> Self {
        Self { codec, users }
    }

    /// Validate a presented token of the required type against the
    /// store's current jti.
    ///
    /// A missing `sub` or `jti` claim already fails at decode time, so a
    /// successfully decoded token always carries both.
    pub async fn authorize(
        &self,
        token: &str,
        required_type: TokenType,
    ) -> Result<Claims, AuthError> {
        let claims = self.codec.decode(token)?;
        if claims.token_type != required_type {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .users
            .get_by_username(&claims.sub)
            .await
            .map_err(|e| AuthError::Internal(format!("{e:#}")))?
            .ok_or(AuthError::Revoked)?;

        // The stored jti is the liveness check; a mismatch means this
        // token was superseded by a later login, refresh, or logout.
        if user.current_jti.as_deref() != Some(claims.jti.as_str()) {
            return Err(AuthError::Revoked);
        }

        Ok(claims)
    }
}

/// Authenticated user extracted from request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Validated claims of the presented access token.
    pub claims: Claims,
}

impl CurrentUser {
    /// Get the username.
    pub fn username(&self) -> &str {
        &self.claims.sub
    }

    /// Get the session identifier the request was authorized under.
    pub fn jti(&self) -> &str {
        &self.claims.jti
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::MissingAuthHeader)
    }
}

/// Authentication middleware for protected routes.
///
/// Requires `Authorization: Bearer <access_token>`, validates it against
/// the store, and injects `CurrentUser` into request extensions.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = bearer_token_from_header(header)?;
    let claims = auth.authorize(token, TokenType::Access).await?;

    req.extensions_mut().insert(CurrentUser { claims });

    Ok(next.run(req).await)
}
