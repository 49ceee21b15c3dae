use std::fmt;

/// Validates the shared API key presented by trusted server-to-server callers.
#[derive(Clone)]
pub struct ApiKeyValidator {
    key: String,
}

impl ApiKeyValidator {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Returns whether `provided` matches the configured key.
    pub fn validate(&self, provided: &str) -> bool {
        validate_api_key(provided, &self.key)
    }
}

impl fmt::Debug for ApiKeyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiKeyValidator")
            .field("key", &"<redacted>")
            .finish()
    }
}

/// Compares a caller-supplied key against the configured one.
///
/// An empty key on either side never matches.
pub fn validate_api_key(provided: &str, configured: &str) -> bool {
    if provided.is_empty() || configured.is_empty() {
        return false;
    }
    constant_time_eq(provided.as_bytes(), configured.as_bytes())
}

/// Byte comparison that does not exit early on the first difference.
///
/// Runs over the longer input; a length mismatch is folded into the result.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());
    let mut diff = a.len() ^ b.len();
    for i in 0..len {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= usize::from(x ^ y);
    }
    diff == 0
}
