//! User management module.
//!
//! Credential records: username, password hash, and the current session
//! token identifier (jti).

mod models;
mod repository;

pub use models::User;
pub use repository::UserRepository;
