//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check the timing invariants between health checking and failover
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: BalancerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::BalancerConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BadBindAddress(String),

    #[error("no backends configured")]
    NoBackends,

    #[error("backend {name:?} has an invalid address {address:?}")]
    BadBackendAddress { name: String, address: String },

    #[error("backend address {0} is configured more than once")]
    DuplicateBackend(String),

    #[error("health_check.timeout_ms ({timeout_ms}) must be shorter than health_check.interval_ms ({interval_ms})")]
    ProbeTimeoutTooLong { timeout_ms: u64, interval_ms: u64 },

    #[error("health_check.interval_ms must be non-zero")]
    ZeroProbeInterval,

    #[error("failover.deadline_ms ({deadline_ms}) must exceed health_check.interval_ms ({interval_ms})")]
    DeadlineTooShort { deadline_ms: u64, interval_ms: u64 },

    #[error("failover.poll_ms must be non-zero")]
    ZeroPoll,

    #[error("failover.attempt_timeout_ms must be non-zero")]
    ZeroAttemptTimeout,

    #[error("limits.max_body_bytes must be non-zero")]
    ZeroBodyLimit,

    #[error("admin.api_key must be set when the admin API is enabled")]
    MissingAdminKey,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &BalancerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.backends.is_empty() {
        errors.push(ValidationError::NoBackends);
    }

    let mut seen = HashSet::new();
    for backend in &config.backends {
        match backend.address.parse::<SocketAddr>() {
            Ok(addr) => {
                if !seen.insert(addr) {
                    errors.push(ValidationError::DuplicateBackend(addr.to_string()));
                }
            }
            Err(_) => errors.push(ValidationError::BadBackendAddress {
                name: backend.name.clone(),
                address: backend.address.clone(),
            }),
        }
    }

    let health = &config.health_check;
    if health.interval_ms == 0 {
        errors.push(ValidationError::ZeroProbeInterval);
    } else if health.timeout_ms >= health.interval_ms {
        errors.push(ValidationError::ProbeTimeoutTooLong {
            timeout_ms: health.timeout_ms,
            interval_ms: health.interval_ms,
        });
    }

    let failover = &config.failover;
    if failover.deadline_ms <= health.interval_ms {
        errors.push(ValidationError::DeadlineTooShort {
            deadline_ms: failover.deadline_ms,
            interval_ms: health.interval_ms,
        });
    }
    if failover.poll_ms == 0 {
        errors.push(ValidationError::ZeroPoll);
    }
    if failover.attempt_timeout_ms == 0 {
        errors.push(ValidationError::ZeroAttemptTimeout);
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.admin.enabled && config.admin.api_key.is_empty() {
        errors.push(ValidationError::MissingAdminKey);
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
    use crate::config::schema::BackendConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&BalancerConfig::default()).is_ok());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = BalancerConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.backends.clear();
        config.failover.poll_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::BadBindAddress("not-an-address".to_string())));
        assert!(errors.contains(&ValidationError::NoBackends));
        assert!(errors.contains(&ValidationError::ZeroPoll));
    }

    #[test]
    fn rejects_deadline_inside_probe_interval() {
        let mut config = BalancerConfig::default();
        config.health_check.interval_ms = 30_000;
        config.health_check.timeout_ms = 1_000;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::DeadlineTooShort { .. }
        )));
    }

    #[test]
    fn rejects_duplicate_backend_addresses() {
        let mut config = BalancerConfig::default();
        config.backends.push(BackendConfig {
            name: "copy".to_string(),
            address: config.backends[0].address.clone(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::DuplicateBackend(_))));
    }

    #[test]
    fn admin_requires_api_key() {
        let mut config = BalancerConfig::default();
        config.admin.enabled = true;

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingAdminKey));
    }
}
