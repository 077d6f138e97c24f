//! Lifecycle management subsystem.
//!
//! Startup order: config first, then the registry and monitor, listeners
//! last. Shutdown: one broadcast fans out to every long-running task.

pub mod shutdown;

pub use shutdown::Shutdown;
