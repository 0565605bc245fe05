//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Comma-separated list of allowed CORS origins.
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
/// Token signing secret.
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
/// Listener bind address.
pub const ENV_BIND_ADDRESS: &str = "MOCK_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServerConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment settings on top of file/default configuration.
pub fn apply_env_overrides<F>(mut config: ServerConfig, lookup: F) -> ServerConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
        let origins = parse_origin_list(&origins);
        if !origins.is_empty() {
            config.cors.allowed_origins = origins;
        }
    }
    if let Some(secret) = lookup(ENV_JWT_SECRET) {
        config.auth.secret = secret;
    }
    if let Some(addr) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
    config
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
