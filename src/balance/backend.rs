//! Backend abstraction.
//!
//! # Responsibilities
//! - Represent a single backend server
//! - Track health state (Unknown/Healthy/Unhealthy) without locking
//! - Record when the health checker last looked at it
//!
//! # State Transitions
//! ```text
//! Unknown   → Healthy | Unhealthy: first probe result
//! Healthy   → Unhealthy: failed probe
//! Unhealthy → Healthy: successful probe
//! ```
//! A backend is never removed; an unreachable one sits in Unhealthy until
//! it answers a probe again.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

/// Health state enum.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Unknown = 0,
    Healthy = 1,
    Unhealthy = 2,
}

impl From<u8> for HealthState {
    fn from(val: u8) -> Self {
        match val {
            1 => HealthState::Healthy,
            2 => HealthState::Unhealthy,
            _ => HealthState::Unknown,
        }
    }
}

impl HealthState {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Unknown => "unknown",
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
        }
    }
}

/// A single backend server.
#[derive(Debug)]
pub struct Backend {
    /// Configured backend identifier.
    pub name: String,
    /// The private address the backend is dialed on.
    pub addr: SocketAddr,
    /// Pre-calculated base URL for forwarding.
    pub base_url: Url,

    /// Current health state (0=Unknown, 1=Healthy, 2=Unhealthy).
    state: AtomicU8,
    /// When the health checker last recorded a result, epoch milliseconds.
    last_checked_ms: AtomicU64,
}

impl Backend {
    /// Create a new backend in the Unknown state.
    pub fn new(name: &str, addr: SocketAddr) -> Self {
        let base_url = Url::parse(&format!("http://{}", addr)).unwrap();
        Self {
            name: name.to_string(),
            addr,
            base_url,
            state: AtomicU8::new(HealthState::Unknown as u8),
            last_checked_ms: AtomicU64::new(0),
        }
    }

    /// Current health state.
    pub fn state(&self) -> HealthState {
        self.state.load(Ordering::Relaxed).into()
    }

    /// True when the backend may receive traffic. Unknown backends are not
    /// selectable; they become so on their first successful probe.
    pub fn is_healthy(&self) -> bool {
        self.state() == HealthState::Healthy
    }

    /// Overwrite the health state and stamp the check time. Returns the
    /// previous state so callers can log transitions.
    pub fn set_state(&self, next: HealthState) -> HealthState {
        self.last_checked_ms.store(epoch_ms(), Ordering::Relaxed);
        self.state.swap(next as u8, Ordering::Relaxed).into()
    }

    /// Epoch milliseconds of the most recent health probe, 0 if never
    /// probed.
    pub fn last_checked_ms(&self) -> u64 {
        self.last_checked_ms.load(Ordering::Relaxed)
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
