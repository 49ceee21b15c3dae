//! Authentication and credential lifecycle
//!
//! This module provides the authentication core for the Chirpy API: password
//! hashing, signed access tokens, store-backed refresh tokens and the shared
//! API key used by the payment provider webhook.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id password hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - HS256 access token issuance and validation
//! - [`auth::refresh`](crate::auth::refresh) - Opaque refresh tokens: generate, issue, resolve, revoke
//! - [`auth::api_key`](crate::auth::api_key) - Constant-time API key check
//! - [`auth::middleware`](crate::auth::middleware) - Header extraction, Axum layers and extractors
//!
//! # Token Lifetimes
//!
//! - **Access tokens** live at most one hour. Requests for longer lifetimes are
//!   clamped. There is no server-side record, so rotating the signing secret
//!   invalidates every outstanding token.
//! - **Refresh tokens** live 60 days unless revoked. A token that fails
//!   resolution for any reason is revoked on the spot.
//!
//! # Usage
//!
//! ```ignore
//! use chirpy::auth::jwt::AccessTokenCodec;
//! use std::time::Duration;
//!
//! let codec = AccessTokenCodec::new(&signing_secret);
//! let token = codec.issue(user_id, Duration::from_secs(3600))?;
//! assert_eq!(codec.validate(&token)?, user_id);
//! ```
//!
//! # Configuration
//!
//! Secrets are injected at construction. `chirpy.toml` names the environment
//! variables that hold them:
//! ```toml
//! [auth]
//! jwt_secret_env = "JWT_SECRET"
//! api_key_env = "POLKA_KEY"
//! ```

/// Constant-time API key validation.
pub mod api_key;
/// Error type shared by the authentication components.
pub mod error;
/// Access token encoding and validation.
pub mod jwt;
/// Authentication middleware and extractors for protected routes.
pub mod middleware;
/// Password hashing and verification.
pub mod password;
/// Refresh token generation and lifecycle.
pub mod refresh;

pub use api_key::ApiKeyValidator;
pub use error::AuthError;
pub use jwt::AccessTokenCodec;
pub use password::PasswordHasher;
pub use refresh::{RefreshTokenManager, RotationPolicy};
