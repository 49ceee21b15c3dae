//! Database abstraction traits
//!
//! This module provides the `DatabaseClient` trait that abstracts over the
//! credential and chirp store (in-memory SQLite, file-based SQLite).
//!
//! # Example
//!
//! ```rust,ignore
//! use chirpy::db::{DatabaseClient, DatabaseProvider};
//!
//! // Use in-memory database (default for development/testing)
//! let db = DatabaseProvider::Memory.create_client().await?;
//!
//! // Use file-based SQLite
//! let db = DatabaseProvider::SQLite { path: "data/chirpy.db".into() }.create_client().await?;
//! ```

use crate::types::{Chirp, RefreshTokenRecord, Result, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
}

impl DatabaseProvider {
    /// Picks a provider from a configured URL. `:memory:` selects the in-memory store.
    pub fn from_url(url: &str) -> Self {
        if url.is_empty() || url == ":memory:" {
            DatabaseProvider::Memory
        } else {
            DatabaseProvider::SQLite {
                path: url.to_string(),
            }
        }
    }

    /// Create a database client from this provider configuration
    pub async fn create_client(&self) -> Result<Arc<dyn DatabaseClient>> {
        match self {
            DatabaseProvider::Memory => {
                let client = super::turso::TursoClient::new_memory().await?;
                Ok(Arc::new(client))
            }
            DatabaseProvider::SQLite { path } => {
                let client = super::turso::TursoClient::new_local(path).await?;
                Ok(Arc::new(client))
            }
        }
    }
}

/// Abstract trait for database operations
///
/// Implementations must give atomic per-row create, read and field update;
/// callers do no locking of their own.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    // ============== User Operations ==============

    /// Create a new user
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User>;

    /// Get a user by email
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Replace a user's email and password hash. `None` if the user is gone.
    async fn update_user(&self, id: Uuid, email: &str, password_hash: &str)
        -> Result<Option<User>>;

    /// Set the Chirpy Red flag. Returns `false` if no such user exists.
    async fn upgrade_user(&self, id: Uuid) -> Result<bool>;

    /// Delete every user along with their chirps and refresh tokens
    async fn delete_all_users(&self) -> Result<()>;

    // ============== Refresh Token Operations ==============

    /// Persist a refresh token row
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<()>;

    /// Look a refresh token up by exact match
    async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` if it is not already set. Unknown tokens are a no-op.
    ///
    /// Returns `true` only for the call that actually revoked the row.
    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<bool>;

    // ============== Chirp Operations ==============

    /// Create a chirp
    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp>;

    /// Get a chirp by ID
    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>>;

    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<Chirp>>;

    /// Delete a chirp by ID
    async fn delete_chirp(&self, id: Uuid) -> Result<()>;
}
