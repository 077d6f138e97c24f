//! Backend registry.
//!
//! # Responsibilities
//! - Own every configured backend for the process lifetime
//! - Accept health updates from the single writer (the health checker)
//! - Publish an atomic snapshot of the currently healthy backends
//!
//! # Design Decisions
//! - The map is fixed once the registry is shared: `register` takes
//!   `&mut self`, so backends can only be added while building
//! - Per-backend state is atomic and the healthy view is republished
//!   through `ArcSwap`, so readers never observe a torn update
//! - `set_health` on an unregistered address is a silent no-op

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::balance::backend::{Backend, HealthState};
use crate::config::BackendConfig;

/// Registry of all known backends and their health.
#[derive(Debug)]
pub struct Registry {
    backends: HashMap<SocketAddr, Arc<Backend>>,
    /// Configuration order, kept stable for sweeps and the admin listing.
    order: Vec<Arc<Backend>>,
    /// Snapshot of currently healthy backends, swapped atomically on each
    /// health transition.
    healthy: ArcSwap<Vec<Arc<Backend>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            backends: HashMap::new(),
            order: Vec::new(),
            healthy: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Build a registry from configuration, skipping unparseable addresses.
    pub fn from_config(configs: &[BackendConfig]) -> Self {
        let mut registry = Self::new();
        for config in configs {
            match config.address.parse() {
                Ok(addr) => registry.register(&config.name, addr),
                Err(_) => {
                    tracing::warn!(
                        name = %config.name,
                        address = %config.address,
                        "Invalid backend address, skipping"
                    );
                }
            }
        }
        registry
    }

    /// Add a backend in the Unknown state. Idempotent per address.
    pub fn register(&mut self, name: &str, addr: SocketAddr) {
        if self.backends.contains_key(&addr) {
            return;
        }
        let backend = Arc::new(Backend::new(name, addr));
        self.backends.insert(addr, backend.clone());
        self.order.push(backend);
    }

    /// Overwrite the health of one backend and republish the healthy
    /// snapshot. No-op for addresses that were never registered.
    pub fn set_health(&self, addr: SocketAddr, status: HealthState) {
        let Some(backend) = self.backends.get(&addr) else {
            return;
        };
        let previous = backend.set_state(status);
        if previous != status {
            tracing::info!(
                name = %backend.name,
                addr = %addr,
                from = previous.as_str(),
                to = status.as_str(),
                "Backend health changed"
            );
            self.publish_healthy();
        }
    }

    /// Atomic snapshot of the currently healthy backends.
    pub fn healthy_backends(&self) -> Arc<Vec<Arc<Backend>>> {
        self.healthy.load_full()
    }

    /// Every registered backend, in configuration order.
    pub fn all_backends(&self) -> &[Arc<Backend>] {
        &self.order
    }

    fn publish_healthy(&self) {
        let healthy: Vec<Arc<Backend>> = self
            .order
            .iter()
            .filter(|b| b.is_healthy())
            .cloned()
            .collect();
        self.healthy.store(Arc::new(healthy));
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = Registry::new();
        registry.register("b1", addr(8001));
        registry.register("b1", addr(8001));
        assert_eq!(registry.all_backends().len(), 1);
    }

    #[test]
    fn set_health_for_unknown_address_is_a_noop() {
        let mut registry = Registry::new();
        registry.register("b1", addr(8001));
        registry.set_health(addr(9999), HealthState::Healthy);
        assert!(registry.healthy_backends().is_empty());
    }

    #[test]
    fn healthy_snapshot_follows_transitions() {
        let mut registry = Registry::new();
        registry.register("b1", addr(8001));
        registry.register("b2", addr(8002));
        assert!(registry.healthy_backends().is_empty());

        registry.set_health(addr(8001), HealthState::Healthy);
        let healthy = registry.healthy_backends();
        assert_eq!(healthy.len(), 1);
        assert_eq!(healthy[0].addr, addr(8001));

        registry.set_health(addr(8002), HealthState::Healthy);
        assert_eq!(registry.healthy_backends().len(), 2);

        registry.set_health(addr(8001), HealthState::Unhealthy);
        let healthy = registry.healthy_backends();
        assert_eq!(healthy.len(), 1);
        assert_eq!(healthy[0].addr, addr(8002));
    }

    #[test]
    fn repeated_identical_updates_keep_a_stable_view() {
        let mut registry = Registry::new();
        registry.register("b1", addr(8001));

        registry.set_health(addr(8001), HealthState::Healthy);
        let first = registry.healthy_backends();
        registry.set_health(addr(8001), HealthState::Healthy);
        let second = registry.healthy_backends();

        // Same state written twice: the published snapshot is not churned.
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn snapshot_taken_before_a_transition_is_unaffected() {
        let mut registry = Registry::new();
        registry.register("b1", addr(8001));
        registry.set_health(addr(8001), HealthState::Healthy);

        let snapshot = registry.healthy_backends();
        registry.set_health(addr(8001), HealthState::Unhealthy);

        assert_eq!(snapshot.len(), 1);
        assert!(registry.healthy_backends().is_empty());
    }
}
