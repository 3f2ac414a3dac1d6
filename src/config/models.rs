//! Configuration data structures for Portico.
//!
//! These types map directly to TOML (also JSON / YAML) configuration files. They are
//! intentionally serde‑friendly and include defaults so that minimal configs remain concise.
//! The builder is considered part of the public API for embedding.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

fn default_port() -> u16 {
    8080
}

fn default_window_ms() -> i64 {
    60_000
}

fn default_max_requests() -> u64 {
    100
}

/// Fixed‑window rate limit settings, applied per client address.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in milliseconds.
    pub window_ms: i64,
    /// Maximum allowed requests per client within one window.
    pub max: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max: default_max_requests(),
        }
    }
}

/// A route declared in the configuration file. Registered at startup in
/// file order, which determines match precedence (first registered wins).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Literal path prefix to match against incoming request paths.
    pub prefix: String,
    /// Name of the upstream this route forwards to.
    pub upstream: String,
}

/// Top‑level gateway configuration. Immutable once the gateway is built.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    /// Port the server adapter listens on.
    pub port: u16,
    /// Per‑client rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Named upstream destinations (name → base URL).
    pub upstreams: HashMap<String, String>,
    /// Routes to register at startup, in order.
    pub routes: Vec<RouteEntry>,
}

impl GatewayConfig {
    /// Create a new gateway configuration builder
    pub fn builder() -> GatewayConfigBuilder {
        GatewayConfigBuilder::default()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            rate_limit: RateLimitConfig::default(),
            upstreams: HashMap::new(),
            routes: Vec::new(),
        }
    }
}

/// Builder for GatewayConfig to allow for cleaner configuration creation
#[derive(Default)]
pub struct GatewayConfigBuilder {
    port: Option<u16>,
    rate_limit: Option<RateLimitConfig>,
    upstreams: HashMap<String, String>,
    routes: Vec<RouteEntry>,
}

impl GatewayConfigBuilder {
    /// Set the listen port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the rate limit window and maximum
    pub fn rate_limit(mut self, window_ms: i64, max: u64) -> Self {
        self.rate_limit = Some(RateLimitConfig { window_ms, max });
        self
    }

    /// Add a named upstream with its base URL
    pub fn upstream(mut self, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.upstreams.insert(name.into(), base_url.into());
        self
    }

    /// Add a route with the given path prefix and upstream name
    pub fn route(mut self, prefix: impl Into<String>, upstream: impl Into<String>) -> Self {
        self.routes.push(RouteEntry {
            prefix: prefix.into(),
            upstream: upstream.into(),
        });
        self
    }

    /// Build the final GatewayConfig
    pub fn build(self) -> GatewayConfig {
        GatewayConfig {
            port: self.port.unwrap_or_else(default_port),
            rate_limit: self.rate_limit.unwrap_or_default(),
            upstreams: self.upstreams,
            routes: self.routes,
        }
    }
}
