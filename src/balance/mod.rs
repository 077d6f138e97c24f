//! Balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Validated payload arrives
//!     → registry.rs (healthy-backend snapshot)
//!     → round_robin.rs (pick the next backend)
//!     → failover.rs (forward, or poll for recovery until the deadline)
//!     → Backend response relayed, or the exhaustion error
//! ```
//!
//! # Design Decisions
//! - The health checker is the registry's only writer; request handlers
//!   only read snapshots
//! - Selection operates on the healthy snapshot, so the selector itself
//!   never inspects health state
//! - Backends are created at startup and never removed

pub mod backend;
pub mod failover;
pub mod registry;
pub mod round_robin;

use std::sync::Arc;

pub use backend::{Backend, HealthState};
pub use failover::{BackendReply, Forwarder, Unavailable};
pub use registry::Registry;
pub use round_robin::RoundRobin;

/// Backend selection policy over a healthy snapshot.
pub trait Selector: Send + Sync + std::fmt::Debug {
    /// Pick the next backend, or None when the snapshot is empty.
    fn next(&self, backends: &[Arc<Backend>]) -> Option<Arc<Backend>>;
}
