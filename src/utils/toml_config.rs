//! TOML-based configuration for Chirpy
//!
//! Infrastructure settings (server, auth, database, content rules) come from
//! `chirpy.toml`. Secrets never live in the file: it names the environment
//! variables that hold them, and [`ChirpyConfig::secrets`] resolves them once
//! at startup.

use crate::auth::jwt::MAX_ACCESS_TOKEN_TTL;
use crate::auth::refresh::REFRESH_TOKEN_LIFETIME_DAYS;
use crate::auth::RotationPolicy;
use crate::content::{DEFAULT_DENYLIST, DEFAULT_MAX_LENGTH};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest configurable refresh token lifetime.
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 3650;

/// Root configuration structure loaded from chirpy.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChirpyConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub content: ContentConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Deployment platform. The admin reset endpoint only works on `dev`.
    #[serde(default = "default_platform")]
    pub platform: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_platform() -> String {
    "prod".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_json: false,
            platform: default_platform(),
        }
    }
}

impl ServerConfig {
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

// ============= Authentication Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the JWT signing secret
    #[serde(default = "default_jwt_secret_env")]
    pub jwt_secret_env: String,

    /// Environment variable name containing the webhook API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Default access token lifetime, at most 3600
    #[serde(default = "default_access_token_ttl_secs")]
    pub access_token_ttl_secs: u64,

    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,

    /// Whether a successful refresh revokes the presented refresh token
    #[serde(default)]
    pub rotation_policy: RotationPolicy,
}

fn default_jwt_secret_env() -> String {
    "JWT_SECRET".to_string()
}

fn default_api_key_env() -> String {
    "POLKA_KEY".to_string()
}

fn default_access_token_ttl_secs() -> u64 {
    MAX_ACCESS_TOKEN_TTL.as_secs()
}

fn default_refresh_token_ttl_days() -> i64 {
    REFRESH_TOKEN_LIFETIME_DAYS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret_env: default_jwt_secret_env(),
            api_key_env: default_api_key_env(),
            access_token_ttl_secs: default_access_token_ttl_secs(),
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
            rotation_policy: RotationPolicy::default(),
        }
    }
}

impl AuthConfig {
    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.access_token_ttl_secs)
    }

    /// Refresh token lifetime, clamped to `1..=MAX_REFRESH_TOKEN_TTL_DAYS`
    /// for configs built in code without [`ChirpyConfig::validate`].
    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(
            self.refresh_token_ttl_days
                .clamp(1, MAX_REFRESH_TOKEN_TTL_DAYS),
        )
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "./data/chirpy.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

// ============= Content Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_denylist() -> Vec<String> {
    DEFAULT_DENYLIST.iter().map(|w| w.to_string()).collect()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            denylist: default_denylist(),
        }
    }
}

// ============= Secrets =============

/// Secrets resolved from the environment at startup.
#[derive(Clone)]
pub struct AuthSecrets {
    pub signing_secret: String,
    pub api_key: String,
}

impl fmt::Debug for AuthSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSecrets")
            .field("signing_secret", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),
}

impl ChirpyConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let config: ChirpyConfig = toml::from_str(&content)?;

        // Validate the configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate value ranges. Secrets are checked by [`ChirpyConfig::secrets`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ttl = self.auth.access_token_ttl_secs;
        if ttl == 0 || ttl > MAX_ACCESS_TOKEN_TTL.as_secs() {
            return Err(ConfigError::ValidationError(format!(
                "auth.access_token_ttl_secs must be between 1 and {}, got {}",
                MAX_ACCESS_TOKEN_TTL.as_secs(),
                ttl
            )));
        }

        let days = self.auth.refresh_token_ttl_days;
        if days <= 0 || days > MAX_REFRESH_TOKEN_TTL_DAYS {
            return Err(ConfigError::ValidationError(format!(
                "auth.refresh_token_ttl_days must be between 1 and {}, got {}",
                MAX_REFRESH_TOKEN_TTL_DAYS,
                self.auth.refresh_token_ttl_days
            )));
        }

        if self.content.max_length == 0 {
            return Err(ConfigError::ValidationError(
                "content.max_length must be positive".to_string(),
            ));
        }

        if self.auth.jwt_secret_env == self.auth.api_key_env {
            return Err(ConfigError::ValidationError(
                "auth.jwt_secret_env and auth.api_key_env must name different variables"
                    .to_string(),
            ));
        }

        Ok(())
    }

    /// Get a resolved value from an env var reference
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    fn required_env(&self, env_name: &str) -> Result<String, ConfigError> {
        match self.resolve_env(env_name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(env_name.to_string())),
        }
    }

    /// Resolve the signing secret and API key. Both are required.
    pub fn secrets(&self) -> Result<AuthSecrets, ConfigError> {
        Ok(AuthSecrets {
            signing_secret: self.required_env(&self.auth.jwt_secret_env)?,
            api_key: self.required_env(&self.auth.api_key_env)?,
        })
    }
}
