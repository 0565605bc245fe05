//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the mock server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the mock server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Where the route table is persisted.
    pub routes: RoutesConfig,

    /// Where response artifacts live.
    pub responses: ResponsesConfig,

    /// Static documentation hosting.
    pub static_files: StaticFilesConfig,

    /// Token signing settings.
    pub auth: AuthConfig,

    /// Cross-origin policy.
    pub cors: CorsConfig,

    /// Administrative endpoint settings.
    pub admin: AdminConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Route table storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path of the JSON route configuration file.
    pub path: String,

    /// Reload the table when the file changes on disk.
    pub watch: bool,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            path: "routes.json".to_string(),
            watch: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponsesConfig {
    /// Root directory that resolved artifact names are looked up under.
    pub root: String,
}

impl Default for ResponsesConfig {
    fn default() -> Self {
        Self {
            root: "responses".to_string(),
        }
    }
}

/// Static documentation hosting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub enabled: bool,

    /// Directory served verbatim.
    pub root: String,

    /// URL prefix the directory is mounted under.
    pub mount: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root: "static/swagger".to_string(),
            mount: "/swagger".to_string(),
        }
    }
}

/// Token signing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret for issued bearer tokens.
    pub secret: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            // WARNING: This is a placeholder! Override with JWT_SECRET.
            secret: "your-256-bit-secret".to_string(),
        }
    }
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins echoed back in `Access-Control-Allow-Origin`. `*` allows any.
    pub allowed_origins: Vec<String>,
}

/// Administrative endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// API key for the route configuration endpoints (Bearer token).
    /// When unset the endpoints are open.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [cors]
            allowed_origins = ["https://example.com"]
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.cors.allowed_origins, vec!["https://example.com"]);
        assert_eq!(config.routes.path, "routes.json");
        assert_eq!(config.static_files.mount, "/swagger");
        assert!(config.admin.api_key.is_none());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_lowercase() {
        let config: ObservabilityConfig = toml::from_str(r#"log_format = "json""#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
