//! Observability subsystem.
//!
//! Structured logs through `tracing` (request IDs flow through every
//! subsystem); counters, gauges, and histograms through `metrics` with an
//! optional Prometheus exposition listener.

pub mod logging;
pub mod metrics;
