//! Account handlers: registration, login, refresh, logout.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::instrument;

use crate::auth::{AuthError, CurrentUser, TokenPair};

use super::super::error::ApiResult;
use super::super::state::AppState;

/// Credentials for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Token pair response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Refresh request body.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Logout response.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Whether this call actually ended a live session. `false` means
    /// the presented token was already superseded.
    pub revoked: bool,
}

/// Register a new user.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    state
        .sessions
        .register(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "User registered successfully"})),
    ))
}

/// Log in and receive a fresh access/refresh token pair.
///
/// Starting a session rotates the stored jti, so tokens from any earlier
/// session stop working the moment this succeeds.
#[instrument(skip(state, request), fields(username = %request.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let pair = state
        .sessions
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(pair.into()))
}

/// Exchange a refresh token for a new pair (refresh-token rotation).
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let pair = state.sessions.refresh(&request.refresh_token).await?;
    Ok(Json(pair.into()))
}

/// End the current session.
///
/// Idempotent: repeating with an already-superseded token reports
/// `revoked: false` without mutating anything.
#[instrument(skip(state, user), fields(username = %user.username()))]
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<LogoutResponse>, AuthError> {
    let revoked = state.sessions.logout(user.username(), user.jti()).await?;
    Ok(Json(LogoutResponse { revoked }))
}
