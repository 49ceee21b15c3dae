//! Refresh token lifecycle
//!
//! Refresh tokens are 256-bit random values, hex encoded, persisted through
//! [`DatabaseClient`]. A record moves from active to revoked (explicit logout,
//! failed resolution, or rotation under [`RotationPolicy::RevokePrevious`]) or
//! to expired after 60 days. The state is derived from the stored timestamps
//! by [`RefreshTokenRecord::state_at`].

use crate::auth::AuthError;
use crate::db::DatabaseClient;
use crate::types::{RefreshTokenRecord, RefreshTokenState};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Refresh token lifetime in days.
pub const REFRESH_TOKEN_LIFETIME_DAYS: i64 = 60;

const REFRESH_TOKEN_BYTES: usize = 32;

/// What happens to the presented refresh token after a successful refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationPolicy {
    /// The previous token stays usable until it expires or is revoked.
    #[default]
    Retain,
    /// The previous token is revoked as soon as its successor is issued.
    RevokePrevious,
}

/// Issues, resolves and revokes refresh tokens against the credential store.
pub struct RefreshTokenManager {
    db: Arc<dyn DatabaseClient>,
    lifetime: Duration,
    rotation_policy: RotationPolicy,
}

impl RefreshTokenManager {
    pub fn new(db: Arc<dyn DatabaseClient>) -> Self {
        Self {
            db,
            lifetime: Duration::days(REFRESH_TOKEN_LIFETIME_DAYS),
            rotation_policy: RotationPolicy::default(),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_rotation_policy(mut self, policy: RotationPolicy) -> Self {
        self.rotation_policy = policy;
        self
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        self.rotation_policy
    }

    /// Generates a new opaque token from the thread-local CSPRNG.
    pub fn generate() -> String {
        let bytes: [u8; REFRESH_TOKEN_BYTES] = rand::random();
        hex::encode(bytes)
    }

    /// Persists `token` as an active refresh token for `user_id`.
    pub async fn issue(&self, user_id: Uuid, token: String) -> Result<RefreshTokenRecord, AuthError> {
        let now = Utc::now();
        let record = RefreshTokenRecord {
            token,
            user_id,
            created_at: now,
            expires_at: now + self.lifetime,
            revoked_at: None,
        };

        self.db
            .create_refresh_token(&record)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        tracing::debug!(user_id = %user_id, expires_at = %record.expires_at, "Refresh token issued");
        Ok(record)
    }

    /// Resolves the owner of an active refresh token.
    ///
    /// A token that is unknown, revoked or expired is revoked again (best
    /// effort) before the failure is returned, so it can never be retried into
    /// success. Resolution does not rotate.
    pub async fn resolve_user(&self, token: &str) -> Result<Uuid, AuthError> {
        let now = Utc::now();
        let record = self
            .db
            .get_refresh_token(token)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?;

        let failure = match record {
            None => AuthError::RefreshNotFound,
            Some(record) => match record.state_at(now) {
                RefreshTokenState::Active => return Ok(record.user_id),
                RefreshTokenState::Revoked => AuthError::RefreshRevoked,
                RefreshTokenState::Expired => AuthError::RefreshExpired,
            },
        };

        if let Err(e) = self.db.revoke_refresh_token(token, now).await {
            tracing::warn!(error = %e, "Failed to revoke rejected refresh token");
        }

        tracing::debug!(reason = %failure, "Refresh token rejected");
        Err(failure)
    }

    /// Revokes a refresh token. Unknown and already revoked tokens are fine.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        self.db
            .revoke_refresh_token(token, Utc::now())
            .await
            .map(|_| ())
            .map_err(|e| AuthError::Store(e.to_string()))
    }

    /// Issues a successor to `previous` for `user_id` and applies the
    /// rotation policy to `previous`.
    ///
    /// Under [`RotationPolicy::RevokePrevious`] the previous token is revoked
    /// first, and only the caller whose revoke took effect gets a successor.
    pub async fn rotate(&self, previous: &str, user_id: Uuid) -> Result<RefreshTokenRecord, AuthError> {
        if self.rotation_policy == RotationPolicy::RevokePrevious {
            let claimed = self
                .db
                .revoke_refresh_token(previous, Utc::now())
                .await
                .map_err(|e| AuthError::Store(e.to_string()))?;

            if !claimed {
                tracing::warn!(user_id = %user_id, "Refresh token reused after rotation");
                return Err(AuthError::RefreshRevoked);
            }
        }

        self.issue(user_id, Self::generate()).await
    }
}
