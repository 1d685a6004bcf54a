//! Authentication module.
//!
//! Issues and validates signed access/refresh token pairs carrying a
//! per-user rotating token identifier (jti). The jti stored on the user
//! record is the single source of truth for whether previously issued
//! tokens are still honored: rotating it on login, refresh, or logout
//! retroactively invalidates every token minted under the old value.

mod claims;
mod codec;
mod config;
mod error;
mod middleware;
pub mod password;
mod service;

pub use claims::{Claims, TokenType};
pub use codec::TokenCodec;
pub use config::AuthConfig;
pub use error::AuthError;
pub use middleware::{AuthState, CurrentUser, auth_middleware};
pub use service::{RegisterError, SessionService, TokenPair};
