//! Configuration utilities.

/// `chirpy.toml` loading, validation and secret resolution.
pub mod toml_config;
