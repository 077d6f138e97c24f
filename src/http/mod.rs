//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → validate.rs (ordered rejection pipeline → normalized payload)
//!     → balance::failover (healthy backend, bounded-wait forwarding)
//!     → error.rs shapes every rejection; success relays the backend body
//! ```

pub mod error;
pub mod server;
pub mod validate;

pub use error::RejectError;
pub use server::HttpServer;
pub use validate::Payload;
