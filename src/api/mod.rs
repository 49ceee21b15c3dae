//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer for Chirpy, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Users and sessions
//! - `POST /api/users` - Register a new user
//! - `PUT /api/users` - Update own email and password (access token)
//! - `POST /api/login` - Login, receive an access token and a refresh token
//! - `POST /api/refresh` - Trade a refresh token for a new pair
//! - `POST /api/revoke` - Revoke a refresh token
//!
//! ## Chirps (`/api/chirps`)
//! - `GET /api/chirps` - List all chirps, oldest first
//! - `GET /api/chirps/{chirp_id}` - Get one chirp
//! - `POST /api/chirps` - Post a chirp (access token)
//! - `DELETE /api/chirps/{chirp_id}` - Delete own chirp (access token)
//!
//! ## Webhooks
//! - `POST /api/polka/webhooks` - Payment provider events (API key)
//!
//! ## Operations
//! - `GET /api/healthz` - Health check endpoint
//! - `POST /admin/reset` - Wipe all users (dev platform only)
//!
//! # Authentication
//!
//! Access-token routes expect:
//! ```text
//! Authorization: Bearer <token>
//! ```
//! Refresh and revoke take the refresh token in the same header. The webhook
//! expects `Authorization: ApiKey <key>`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
