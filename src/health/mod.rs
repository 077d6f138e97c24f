//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (monitor.rs)
//!     → GET {probe_path} on every backend, bounded by the probe timeout
//!     → Registry::set_health (direct overwrite, no hysteresis)
//!     → healthy snapshot republished for the forwarder
//! ```
//!
//! # Design Decisions
//! - Single writer: only the monitor ever changes health state
//! - A probe result overwrites the previous state; a stable backend
//!   therefore holds a stable state between real changes

pub mod monitor;

pub use monitor::HealthMonitor;
