/// Failures raised by the authentication components.
///
/// Token, key and password failures all reach clients as the same
/// `401 Unauthorized`; the variants exist so logs can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Failed to sign access token: {0}")]
    Signing(String),

    #[error("Invalid access token: {0}")]
    InvalidSignature(String),

    #[error("Access token issuer mismatch")]
    WrongIssuer,

    #[error("Access token expired")]
    Expired,

    #[error("Malformed authorization header")]
    MalformedHeader,

    #[error("Refresh token not found")]
    RefreshNotFound,

    #[error("Refresh token revoked")]
    RefreshRevoked,

    #[error("Refresh token expired")]
    RefreshExpired,

    #[error("Credential store error: {0}")]
    Store(String),
}
