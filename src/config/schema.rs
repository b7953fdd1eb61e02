//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Redirect rules, evaluated in order. Empty means the built-in table.
    pub redirects: Vec<RedirectRule>,

    /// One-time-code form settings.
    pub code_input: CodeInputConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl GatewayConfig {
    /// The rules the gateway actually serves.
    pub fn effective_redirects(&self) -> Vec<RedirectRule> {
        if self.redirects.is_empty() {
            RedirectRule::defaults()
        } else {
            self.redirects.clone()
        }
    }
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

/// A single redirect: requests matching `source` are sent to `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedirectRule {
    /// Path pattern, e.g. `/guides/:path*`.
    pub source: String,

    /// Path pattern or absolute URL; may reference the source's parameters.
    pub destination: String,

    /// `true` answers 308, `false` answers 307.
    #[serde(default)]
    pub permanent: bool,
}

impl RedirectRule {
    pub fn new(source: impl Into<String>, destination: impl Into<String>, permanent: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            permanent,
        }
    }
}

/// One-time-code form configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CodeInputConfig {
    /// Number of single-digit slots.
    pub slots: usize,

    /// Path the form is served from and posts to.
    pub form_path: String,
}

impl Default for CodeInputConfig {
    fn default() -> Self {
        Self {
            slots: 6,
            form_path: "/auth/code".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.code_input.slots, 6);
        assert!(!config.admin.enabled);
        assert_eq!(config.effective_redirects(), RedirectRule::defaults());
    }

    #[test]
    fn test_redirects_table() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[redirects]]
            source = "/old/:path*"
            destination = "/new/:path*"
            permanent = true

            [[redirects]]
            source = "/tmp"
            destination = "https://example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.redirects.len(), 2);
        assert!(config.redirects[0].permanent);
        assert!(!config.redirects[1].permanent);
        assert_eq!(config.effective_redirects(), config.redirects);
    }
}
