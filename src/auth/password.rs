use crate::auth::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher as _,
        PasswordVerifier, SaltString,
    },
    Argon2,
};

/// Argon2id PHC string with the default cost that matches no password.
///
/// Verifying against it costs the same as a real check; login uses it when
/// the email is unknown.
pub const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hashing using Argon2id with the library's default cost.
///
/// Stateless; copies are free. Hashing is deliberately slow, so async callers
/// should run it on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hashes a password using Argon2id.
    ///
    /// Returns a PHC-formatted hash string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verifies a password against a stored hash.
    ///
    /// `Ok(false)` covers a wrong password and a stored value that is not a
    /// PHC string at all. Any other library failure is an error, which lets
    /// callers tell a corrupted record apart from a bad login.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a PHC string");
                return Ok(false);
            }
        };

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(format!(
                "Failed to verify password: {}",
                e
            ))),
        }
    }
}
