//! Authentication errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Authentication errors.
///
/// `InvalidCredentials`, `InvalidToken`, and `Revoked` all surface to
/// clients as a plain authentication failure; the distinction exists for
/// logging only, so responses never reveal whether a username exists or
/// why a token was rejected.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad username or password at login. Never distinguishes which.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Malformed, unsigned, expired, tampered, or wrong-type token.
    #[error("invalid token")]
    InvalidToken,

    /// Well-formed token whose jti no longer matches the store, i.e. it
    /// was superseded by a later login, refresh, or logout.
    #[error("token revoked")]
    Revoked,

    /// Missing authorization header.
    #[error("missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("invalid authorization header format")]
    InvalidAuthHeader,

    /// Internal error.
    #[error("internal auth error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_code: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid username or password",
            ),
            // One indistinguishable body for every token rejection.
            AuthError::InvalidToken | AuthError::Revoked => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "authentication failed",
            ),
            AuthError::MissingAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "missing_auth_header",
                "missing authorization header",
            ),
            AuthError::InvalidAuthHeader => (
                StatusCode::UNAUTHORIZED,
                "invalid_auth_header",
                "invalid authorization header format",
            ),
            AuthError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            ),
        };

        match &self {
            AuthError::Internal(msg) => error!(message = %msg, "auth internal error"),
            other => warn!(reason = %other, "authentication rejected"),
        }

        let body = Json(AuthErrorResponse {
            error: message.to_string(),
            error_code: error_code.to_string(),
        });

        (status, body).into_response()
    }
}
