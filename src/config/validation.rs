//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port valid, limits > 0)
//! - Detect a log-tail route shadowed by the beacon route
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BeaconConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BeaconConfig;
use crate::routing::{BeaconRouter, RouteDecision};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must be non-zero")]
    ZeroPort,

    #[error("listener.max_connections must be non-zero")]
    ZeroConnections,

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("beacon.logs_path {0:?} must be a literal path starting with '/' other than '/'")]
    InvalidLogsPath(String),

    #[error("beacon.logs_path {logs:?} is already served by beacon path {beacon:?}")]
    LogsPathShadowed { logs: String, beacon: String },

    #[error("observability.metrics_address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("log.file must not be empty")]
    EmptyLogFile,
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &BeaconConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroConnections);
    }
    if config.timeouts.header_read_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.header_read_ms"));
    }
    if config.timeouts.request_ms == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_ms"));
    }
    if config.limits.max_header_bytes == 0 {
        errors.push(ValidationError::ZeroValue("limits.max_header_bytes"));
    }
    if config.log.file.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }
    if config.log.queue_capacity == 0 {
        errors.push(ValidationError::ZeroValue("log.queue_capacity"));
    }

    if config.beacon.logs_endpoint {
        let logs = config.beacon.logs_path.as_str();
        if !logs.starts_with('/') || logs == "/" || logs.contains(['{', '}', '*']) {
            errors.push(ValidationError::InvalidLogsPath(logs.to_string()));
        } else {
            let router = BeaconRouter::new(&config.beacon.path);
            if router.route(logs) == RouteDecision::Beacon {
                errors.push(ValidationError::LogsPathShadowed {
                    logs: logs.to_string(),
                    beacon: router.pattern().to_string(),
                });
            }
        }
        if config.beacon.logs_tail_bytes == 0 {
            errors.push(ValidationError::ZeroValue("beacon.logs_tail_bytes"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
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

    #[test]
    fn test_default_is_valid() {
        assert_eq!(validate_config(&BeaconConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = BeaconConfig::default();
        config.listener.port = 0;
        config.timeouts.request_ms = 0;
        config.log.file = " ".into();
        config.log.queue_capacity = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroValue("log.queue_capacity")));
        assert!(errors.contains(&ValidationError::ZeroPort));
        assert!(errors.contains(&ValidationError::EmptyLogFile));
    }

    #[test]
    fn test_logs_path_under_wildcard_beacon() {
        let mut config = BeaconConfig::default();
        config.beacon.logs_endpoint = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::LogsPathShadowed { .. }));

        config.beacon.path = "/recon/".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.beacon.logs_path = "/recon/logs".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_logs_path_must_be_literal() {
        let mut config = BeaconConfig::default();
        config.beacon.path = "/recon".into();
        config.beacon.logs_endpoint = true;
        config.beacon.logs_path = "/{file}".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidLogsPath("/{file}".into())])
        );
    }

    #[test]
    fn test_logs_path_ignored_when_disabled() {
        let mut config = BeaconConfig::default();
        config.beacon.logs_path = "nope".into();
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn test_metrics_address_checked_when_enabled() {
        let mut config = BeaconConfig::default();
        config.observability.metrics_address = "not-an-addr".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress("not-an-addr".into())])
        );
    }
}
