use crate::auth::AuthError;
use crate::types::Claims;
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::time::Duration;
use uuid::Uuid;

/// Issuer claim stamped on, and required of, every access token.
pub const ACCESS_TOKEN_ISSUER: &str = "chirpy-access";

/// Upper bound on access token lifetime, whatever the caller asks for.
pub const MAX_ACCESS_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Access token codec: HS256 JWTs binding a user id for a bounded window.
///
/// Tokens are stateless. Validity is the signature plus `iat..exp`; nothing
/// is persisted and nothing can be revoked short of rotating the secret.
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AccessTokenCodec {
    /// Creates a codec for the given signing secret.
    ///
    /// # Arguments
    /// * `secret` - Server-held HMAC secret (should be at least 32 chars)
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issues an access token for `user_id`, valid for `ttl` capped at one hour.
    pub fn issue(&self, user_id: Uuid, ttl: Duration) -> Result<String, AuthError> {
        self.issue_at(user_id, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: Uuid,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let ttl = ttl.min(MAX_ACCESS_TOKEN_TTL);
        let issued_at = now.timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            iat: issued_at,
            exp: issued_at + ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validates a bare token (no `Bearer ` prefix) and returns its subject.
    pub fn validate(&self, token: &str) -> Result<Uuid, AuthError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ACCESS_TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        // Expiry is checked below against `now`, with no leeway.
        validation.validate_exp = false;

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidIssuer => AuthError::WrongIssuer,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidSignature(e.to_string()),
            })?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Uuid::parse_str(&claims.sub)
            .map_err(|e| AuthError::InvalidSignature(format!("subject is not a user id: {}", e)))
    }
}
