//! Password hashing and complexity policy.
//!
//! bcrypt is CPU-bound, so hash and verify run on the blocking thread
//! pool and never stall unrelated requests.

use anyhow::{Context, Result};

/// Hash a password with bcrypt.
pub async fn hash(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        // Lower cost factor for development speed
        let cost = if cfg!(debug_assertions) { 4 } else { 10 };
        bcrypt::hash(&password, cost)
    })
    .await
    .context("password hashing task panicked")?
    .context("hashing password")
}

/// Verify a password against a bcrypt hash.
pub async fn verify(password: String, password_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
        .await
        .context("password verification task panicked")?
        .context("verifying password")
}

/// Check password complexity, collecting every failed rule.
///
/// Applied uniformly at registration: minimum 8 characters with at least
/// one uppercase letter, one lowercase letter, one digit, and one special
/// character.
pub fn validate_complexity(password: &str) -> Result<(), String> {
    let mut problems = Vec::new();

    if password.chars().count() < 8 {
        problems.push("Password must be at least 8 characters long.");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        problems.push("Password must include at least one uppercase letter.");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        problems.push("Password must include at least one lowercase letter.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("Password must include at least one digit.");
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        problems.push("Password must include at least one special character.");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join(" "))
    }
}
