//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! balancer. All types derive Serde traits for deserialization from config
//! files, and every field has a default so a minimal (or absent) config
//! still yields a runnable process.
//!
//! Durations are expressed in milliseconds. The failover deadline and the
//! health-check cadence are calibrated against each other; see
//! `config::validation` for the invariants between them.

use serde::{Deserialize, Serialize};

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Listener configuration (public bind address).
    pub listener: ListenerConfig,

    /// Backend server definitions.
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendConfig>,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Failover policy (deadline, polling cadence, per-attempt timeout).
    pub failover: FailoverConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin API settings.
    pub admin: AdminConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backends: default_backends(),
            health_check: HealthCheckConfig::default(),
            failover: FailoverConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Backend server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier, used in logs and the admin API.
    pub name: String,

    /// Backend address (e.g., "127.0.0.1:8001"). Backends are dialed only
    /// on this address; there is no public passthrough.
    pub address: String,
}

/// The conventional two-backend topology of the business service.
fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig {
            name: "business_one".to_string(),
            address: "127.0.0.1:8001".to_string(),
        },
        BackendConfig {
            name: "business_two".to_string(),
            address: "127.0.0.1:8002".to_string(),
        },
    ]
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable the background health checker.
    pub enabled: bool,

    /// Probe interval in milliseconds.
    pub interval_ms: u64,

    /// Per-probe timeout in milliseconds. Must be shorter than the
    /// interval so sweeps never overlap.
    pub timeout_ms: u64,

    /// Path to probe on each backend.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 2_000,
            timeout_ms: 1_000,
            path: "/status".to_string(),
        }
    }
}

/// Failover policy configuration.
///
/// The deadline sits strictly inside the (20s, 30s) calibration bracket: a
/// backend recovering around 20s must still serve the request, one
/// recovering around 30s must not.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Overall per-request deadline in milliseconds.
    pub deadline_ms: u64,

    /// Polling cadence of the wait-for-recovery loop in milliseconds.
    pub poll_ms: u64,

    /// Timeout for a single forward attempt in milliseconds.
    pub attempt_timeout_ms: u64,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            deadline_ms: 25_000,
            poll_ms: 500,
            attempt_timeout_ms: 2_000,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes. Bodies of exactly this size are
    /// accepted; one byte over is rejected.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1_048_576,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable the read-only admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token). Required when enabled.
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: String::new(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_gets_defaults() {
        let config: BalancerConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.failover.deadline_ms, 25_000);
        assert_eq!(config.limits.max_body_bytes, 1_048_576);
        assert!(config.health_check.enabled);
        assert!(!config.admin.enabled);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: BalancerConfig = toml::from_str(
            r#"
            [failover]
            deadline_ms = 21500

            [[backends]]
            name = "only"
            address = "127.0.0.1:9001"
            "#,
        )
        .unwrap();
        assert_eq!(config.failover.deadline_ms, 21_500);
        assert_eq!(config.failover.poll_ms, 500);
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.backends[0].name, "only");
    }
}
