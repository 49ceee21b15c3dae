//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Admin-only maintenance handlers.
pub mod admin;
/// Login, refresh and revoke handlers.
pub mod auth;
/// Chirp CRUD handlers.
pub mod chirps;
/// Liveness probe.
pub mod health;
/// User registration and update handlers.
pub mod users;
/// Payment provider webhook handlers.
pub mod webhooks;

use crate::auth::PasswordHasher;
use crate::types::{AppError, Result};

/// Hashes on the blocking pool so a slow Argon2 run never stalls the runtime.
pub(crate) async fn hash_password(hasher: PasswordHasher, password: String) -> Result<String> {
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))??;
    Ok(hash)
}

pub(crate) async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool> {
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))??;
    Ok(matches)
}
