//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BalancerConfig (validated, immutable)
//!     → shared by clone to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the process lifetime; the backend set, the
//!   failover deadline, and the probe cadence never change after startup
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AdminConfig;
pub use schema::BackendConfig;
pub use schema::BalancerConfig;
pub use schema::FailoverConfig;
pub use schema::HealthCheckConfig;
pub use schema::ListenerConfig;
