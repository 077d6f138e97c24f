//! Failover load balancer for the JSON string-reversal business service.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                LOAD BALANCER                  │
//!                        │                                               │
//!   Client Request       │  ┌─────────┐   ┌───────────┐   ┌──────────┐  │
//!   ─────────────────────┼─▶│  http   │──▶│ validator │──▶│ balance  │  │
//!                        │  │ server  │   │ pipeline  │   │ failover │  │
//!                        │  └─────────┘   └───────────┘   └────┬─────┘  │
//!                        │                                     │        │
//!   Client Response      │                                     ▼        │
//!   ◀────────────────────┼──────────────────────────────┌──────────┐    │     Backend
//!                        │                              │ registry │◀───┼──── Servers
//!                        │                              │ snapshot │    │   (private
//!                        │                              └────▲─────┘    │    addresses)
//!                        │  ┌──────────────────────────────┐ │          │
//!                        │  │ health monitor (sole writer) │─┘          │
//!                        │  └──────────────────────────────┘            │
//!                        └──────────────────────────────────────────────┘
//! ```
//!
//! Requests are validated before any backend is contacted, then forwarded
//! to a healthy backend. When none is healthy the forwarder polls the
//! registry for recovery until the per-request deadline elapses, at which
//! point the client sees the single `business server not available`
//! signal.

// Core subsystems
pub mod balance;
pub mod config;
pub mod health;
pub mod http;

// Cross-cutting concerns
pub mod admin;
pub mod lifecycle;
pub mod observability;

pub use config::BalancerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
