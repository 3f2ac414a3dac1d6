//! Core gateway orchestration service.
//!
//! The `Gateway` aggregates immutable configuration (`GatewayConfig`)
//! with runtime state (route table, per‑client rate limit windows,
//! metrics). It provides:
//! * Route registration and first‑match prefix lookup
//! * The request pipeline: rate limit → route lookup → forward → metrics
//! * Health and metrics reports
//!
//! This layer performs no I/O of its own; the forwarding step is
//! delegated to the injected [`Forwarder`] port, and the pipeline only
//! suspends while awaiting it. Every failure encountered while handling
//! a request becomes a structured response; `handle_request` never
//! fails outward. Only route registration can.
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
    time::Instant,
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::{
    config::{models::GatewayConfig, validation::ValidationResult},
    core::{metrics::GatewayMetrics, rate_limiter::FixedWindowLimiter, router::RouteTable},
    ports::forwarder::Forwarder,
};

/// An incoming request as seen by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub path: String,
    pub client_ip: String,
}

/// The pipeline's answer: always well formed, never a raw fault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseDescriptor {
    pub status: u16,
    pub body: serde_json::Value,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl ResponseDescriptor {
    fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "error": message }),
            headers: HashMap::new(),
        }
    }
}

/// Snapshot returned by the health operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub routes: usize,
    pub upstreams: Vec<String>,
}

/// Snapshot returned by the metrics operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub timestamp: DateTime<Utc>,
    pub requests_total: u64,
    pub errors_total: u64,
    pub avg_request_duration_ms: f64,
}

/// Central orchestrator for routing, rate limiting and metrics. An
/// instance is cheap to share (construct once, wrap in an `Arc`).
///
/// Construct with [`Gateway::new`] by passing an `Arc<GatewayConfig>`
/// and a [`Forwarder`] implementation. Routes declared in the
/// configuration are registered during construction, in order.
pub struct Gateway {
    config: Arc<GatewayConfig>,
    routes: RwLock<RouteTable>,
    rate_limiter: FixedWindowLimiter,
    metrics: GatewayMetrics,
    forwarder: Arc<dyn Forwarder>,
}

impl Gateway {
    /// Create a new gateway from a configuration and a forwarding
    /// collaborator. Fails if a config-declared route is invalid.
    pub fn new(config: Arc<GatewayConfig>, forwarder: Arc<dyn Forwarder>) -> ValidationResult<Self> {
        let mut routes = RouteTable::new();
        for entry in &config.routes {
            routes.register(entry.prefix.clone(), entry.upstream.clone())?;
        }

        tracing::info!(
            port = config.port,
            window_ms = config.rate_limit.window_ms,
            max = config.rate_limit.max,
            upstreams = config.upstreams.len(),
            "Gateway initialized"
        );

        Ok(Self {
            rate_limiter: FixedWindowLimiter::new(&config.rate_limit),
            config,
            routes: RwLock::new(routes),
            metrics: GatewayMetrics::new(),
            forwarder,
        })
    }

    /// The immutable configuration this gateway was built from.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Register a route binding `path_prefix` to the named upstream.
    /// Re-registering a prefix overwrites the previous binding without
    /// changing its match precedence.
    pub fn register_route(
        &self,
        path_prefix: impl Into<String>,
        upstream: impl Into<String>,
    ) -> ValidationResult<()> {
        self.routes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(path_prefix, upstream)
    }

    /// Run one request through the pipeline: count it, rate limit, match
    /// a route, forward, record the outcome. Terminal on the first
    /// failing stage.
    pub async fn handle_request(&self, request: RequestDescriptor) -> ResponseDescriptor {
        let started = Instant::now();
        self.metrics.record_request();

        let request_id = Uuid::new_v4();
        let received_at = Utc::now();

        tracing::info!(
            method = %request.method,
            path = %request.path,
            request_id = %request_id,
            timestamp = %received_at.to_rfc3339(),
            "Request received"
        );

        let decision = self
            .rate_limiter
            .check(&request.client_ip, received_at.timestamp_millis());
        if !decision.allowed {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                request_id = %request_id,
                timestamp = %received_at.to_rfc3339(),
                client_ip = %request.client_ip,
                count = decision.count,
                "Rate limit exceeded"
            );
            // The advertised reset time is now + window, not the
            // window's actual expiry.
            let reset_at = received_at + Duration::milliseconds(self.config.rate_limit.window_ms);
            let mut response = ResponseDescriptor::error(429, "Rate limit exceeded");
            response
                .headers
                .insert("X-RateLimit-Reset".to_string(), reset_at.to_rfc3339());
            return response;
        }

        let upstream = {
            let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
            match routes.lookup(&request.path) {
                Some(route) => route.upstream.clone(),
                None => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        request_id = %request_id,
                        timestamp = %received_at.to_rfc3339(),
                        "Route not found"
                    );
                    return ResponseDescriptor::error(404, "Not found");
                }
            }
        };

        match self.forwarder.forward(&upstream, &request).await {
            Ok(response) => {
                let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.metrics.record_duration(duration_ms);
                tracing::info!(
                    method = %request.method,
                    path = %request.path,
                    request_id = %request_id,
                    timestamp = %received_at.to_rfc3339(),
                    status = response.status,
                    duration_ms,
                    "Request completed"
                );
                response
            }
            Err(e) => {
                self.metrics.record_error();
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    request_id = %request_id,
                    timestamp = %received_at.to_rfc3339(),
                    upstream = %upstream,
                    error = %e,
                    "Upstream error"
                );
                ResponseDescriptor::error(502, "Bad gateway")
            }
        }
    }

    /// Build the health report. Always succeeds; no side effects.
    pub fn health(&self) -> HealthReport {
        let mut upstreams: Vec<String> = self.config.upstreams.keys().cloned().collect();
        upstreams.sort();

        HealthReport {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            routes: self
                .routes
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len(),
            upstreams,
        }
    }

    /// Build the metrics report. Always succeeds; no side effects.
    pub fn metrics(&self) -> MetricsReport {
        let snapshot = self.metrics.snapshot();
        MetricsReport {
            timestamp: Utc::now(),
            requests_total: snapshot.requests_total,
            errors_total: snapshot.errors_total,
            avg_request_duration_ms: snapshot.avg_request_duration_ms,
        }
    }
}
