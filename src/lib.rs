//! Portico - a minimal API gateway.
//!
//! Portico registers path-prefix routes to named upstreams, applies a
//! fixed-window rate limit per client address, and dispatches matched
//! requests to a pluggable forwarding collaborator. It follows a
//! **hexagonal architecture**: business logic lives in `core`, trait
//! seams in `ports`, implementations in `adapters`. This library exposes
//! the building blocks so you can embed the gateway or compose parts of
//! it inside your own application.
//!
//! # Features
//! - Path-based routing with literal prefix matching (first registered
//!   route wins, not longest match)
//! - Per-client fixed-window rate limiting with exclusive rollover
//! - Request metrics: totals, error count, mean request duration
//! - Health and metrics reports, also served over HTTP by the binary
//! - Ergonomic configuration (TOML / JSON / YAML) with validation
//! - Structured tracing via `tracing`
//!
//! # Quick Example
//! ```no_run
//! use std::sync::Arc;
//!
//! use portico::{Gateway, StubForwarder, config::GatewayConfig};
//!
//! # #[tokio::main] async fn main() -> eyre::Result<()> {
//! let config = Arc::new(
//!     GatewayConfig::builder()
//!         .rate_limit(60_000, 100)
//!         .upstream("users", "http://localhost:3001")
//!         .build(),
//! );
//! let forwarder = Arc::new(StubForwarder::new(&config));
//! let gateway = Gateway::new(config, forwarder)?;
//! gateway.register_route("/api/users", "users")?;
//! # Ok(()) }
//! ```
//!
//! # Error Handling
//! Route registration and configuration loading are the only fallible
//! operations; request handling always produces a well-formed response.
//! Domain errors use `thiserror`; the binary wraps fallible paths in
//! `eyre::Result` with context.
//!
//! # Known bounds
//! The rate-limit table and the duration sample list grow for the
//! process lifetime; neither is evicted. See the module docs of
//! [`core::rate_limiter`] and [`core::metrics`].
// Re-export public modules with explicit visibility controls
pub mod config;
pub mod ports;
pub mod tracing_setup;

// These modules are implementation details and should not be directly used by users
pub mod adapters;
pub mod core;

// Re-export the specific types needed by the binary crate
pub use crate::{
    adapters::{GatewayHttpHandler, StubForwarder},
    core::{
        Gateway,
        gateway::{RequestDescriptor, ResponseDescriptor},
    },
    ports::forwarder::Forwarder,
};
