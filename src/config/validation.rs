//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Compile every redirect rule and report each one that fails
//! - Validate value ranges (timeouts > 0, slot count, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::redirect::table::{CompiledRule, RuleError};

/// Largest supported code length.
pub const MAX_CODE_SLOTS: usize = 12;

/// Paths the gateway routes itself; the code form cannot take them over.
const RESERVED_PATHS: &[&str] = &["/healthz", "/admin"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("code_input.slots must be between 1 and 12, got {0}")]
    SlotCount(usize),

    #[error("code_input.form_path {path:?} {reason}")]
    FormPath { path: String, reason: &'static str },

    #[error(transparent)]
    Rule(#[from] RuleError),
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// The form path becomes a literal axum route, so it must be free of route
/// syntax and must not collide with the gateway's own routes.
fn check_form_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("must start with '/'");
    }
    if path.contains(['{', '}']) {
        return Err("must not contain '{' or '}'");
    }
    if path.split('/').any(|segment| segment.starts_with([':', '*'])) {
        return Err("must not have segments starting with ':' or '*'");
    }
    let trimmed = path.trim_end_matches('/');
    let reserved = RESERVED_PATHS.iter().any(|reserved| {
        trimmed == *reserved || trimmed.starts_with(&format!("{reserved}/"))
    });
    if reserved {
        return Err("is reserved for the gateway's own routes");
    }
    Ok(())
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address("listener.bind_address", &config.listener.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let slots = config.code_input.slots;
    if slots == 0 || slots > MAX_CODE_SLOTS {
        errors.push(ValidationError::SlotCount(slots));
    }
    if let Err(reason) = check_form_path(&config.code_input.form_path) {
        errors.push(ValidationError::FormPath {
            path: config.code_input.form_path.clone(),
            reason,
        });
    }

    for (index, rule) in config.redirects.iter().enumerate() {
        if let Err(e) = CompiledRule::compile(index, rule) {
            errors.push(e.into());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RedirectRule;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.code_input.slots = 0;
        config.redirects = vec![
            RedirectRule::new("no-slash", "/x", true),
            RedirectRule::new("/fine/:path*", "/ok/:path*", true),
            RedirectRule::new("/a/:x", "/b/:missing", false),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::InvalidAddress { .. }));
        assert_eq!(errors[1], ValidationError::ZeroTimeout);
        assert_eq!(errors[2], ValidationError::SlotCount(0));
        assert!(matches!(&errors[3], ValidationError::Rule(e) if e.index == 0));
        assert!(matches!(&errors[4], ValidationError::Rule(e) if e.index == 2));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = GatewayConfig::default();
        config.observability.metrics_address = "bad".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_slot_upper_bound() {
        let mut config = GatewayConfig::default();
        config.code_input.slots = MAX_CODE_SLOTS + 1;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::SlotCount(MAX_CODE_SLOTS + 1)])
        );
    }

    fn form_path_error(path: &str) -> Option<&'static str> {
        let mut config = GatewayConfig::default();
        config.code_input.form_path = path.into();
        match validate_config(&config) {
            Ok(()) => None,
            Err(errors) => match errors.as_slice() {
                [ValidationError::FormPath { reason, .. }] => Some(*reason),
                other => panic!("unexpected errors: {other:?}"),
            },
        }
    }

    #[test]
    fn test_form_path_needs_leading_slash() {
        assert_eq!(form_path_error("auth/code"), Some("must start with '/'"));
    }

    #[test]
    fn test_form_path_rejects_healthz() {
        assert!(form_path_error("/healthz").is_some());
        assert!(form_path_error("/healthz/").is_some());
    }

    #[test]
    fn test_form_path_rejects_admin_routes() {
        assert!(form_path_error("/admin").is_some());
        assert!(form_path_error("/admin/status").is_some());
        assert_eq!(form_path_error("/administration/code"), None);
    }

    #[test]
    fn test_form_path_rejects_capture_segments() {
        assert!(form_path_error("/auth/:code").is_some());
        assert!(form_path_error("/auth/*rest").is_some());
        assert_eq!(form_path_error("/auth/co:de"), None);
    }

    #[test]
    fn test_form_path_rejects_braces() {
        assert!(form_path_error("/auth/{code}").is_some());
        assert!(form_path_error("/auth/{").is_some());
    }

    #[test]
    fn test_form_path_accepts_plain_paths() {
        assert_eq!(form_path_error("/auth/code"), None);
        assert_eq!(form_path_error("/login/one-time-code/"), None);
    }
}
