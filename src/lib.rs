//! # Chirpy
//!
//! Authentication and credential-lifecycle server for a small microblogging
//! service. Users register with an email and password, log in for a
//! short-lived access token plus a long-lived refresh token, and post short
//! "chirps". A payment provider upgrades accounts through an API-key
//! protected webhook.
//!
//! ## Overview
//!
//! Chirpy can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `chirpy-server` binary
//! 2. **As a library** - Build an [`AppState`] and mount [`api::routes::create_router`]
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use chirpy::{AppState, ChirpyConfig, db::DatabaseProvider};
//!
//! let config = ChirpyConfig::load("chirpy.toml")?;
//! let secrets = config.secrets()?;
//! let db = DatabaseProvider::from_url(&config.database.url).create_client().await?;
//!
//! let state = AppState::new(config, db, &secrets.signing_secret, &secrets.api_key);
//! let app = chirpy::api::routes::create_router(state);
//! ```
//!
//! ## Modules
//!
//! - [`api`] - REST API handlers and routes
//! - [`auth`] - Password hashing, access and refresh tokens, API keys, middleware
//! - [`content`] - Chirp length check and word redaction
//! - [`db`] - Storage abstraction and the libsql store
//! - [`types`] - Request/response types, records and error handling
//! - [`utils`] - TOML configuration
//!
//! ## Architecture
//!
//! Everything in [`AppState`] is fixed at startup. Secrets are resolved from
//! the environment once and handed to the components that need them; no
//! component reads globals at request time.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication core and middleware.
pub mod auth;
/// CLI argument parsing for the server binary.
pub mod cli;
/// Chirp content rules.
pub mod content;
/// Storage clients.
pub mod db;
/// Core types (requests, responses, records, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{
    AccessTokenCodec, ApiKeyValidator, AuthError, PasswordHasher, RefreshTokenManager,
    RotationPolicy,
};
pub use content::ContentGuard;
pub use db::{DatabaseClient, DatabaseProvider, TursoClient};
pub use types::{AppError, Result};
pub use utils::toml_config::{AuthSecrets, ChirpyConfig, ConfigError};

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Infrastructure configuration loaded from chirpy.toml
    pub config: Arc<ChirpyConfig>,
    /// Credential and chirp store
    pub db: Arc<dyn DatabaseClient>,
    /// Argon2id password hashing
    pub passwords: PasswordHasher,
    /// Access token issuance and validation
    pub access_tokens: Arc<AccessTokenCodec>,
    /// Refresh token lifecycle
    pub refresh_tokens: Arc<RefreshTokenManager>,
    /// Webhook API key check
    pub api_keys: Arc<ApiKeyValidator>,
    /// Chirp body rules
    pub content_guard: Arc<ContentGuard>,
}

impl AppState {
    /// Wires every component from `config` and the resolved secrets.
    pub fn new(
        config: ChirpyConfig,
        db: Arc<dyn DatabaseClient>,
        signing_secret: &str,
        api_key: &str,
    ) -> Self {
        let refresh_tokens = RefreshTokenManager::new(db.clone())
            .with_lifetime(config.auth.refresh_token_ttl())
            .with_rotation_policy(config.auth.rotation_policy);
        let content_guard = ContentGuard::from_config(&config.content);

        Self {
            config: Arc::new(config),
            db,
            passwords: PasswordHasher::new(),
            access_tokens: Arc::new(AccessTokenCodec::new(signing_secret)),
            refresh_tokens: Arc::new(refresh_tokens),
            api_keys: Arc::new(ApiKeyValidator::new(api_key)),
            content_guard: Arc::new(content_guard),
        }
    }
}
