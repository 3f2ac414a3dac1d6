//! In‑process request metrics accumulator.
//!
//! Counters use atomics so the hot path never takes a lock; the duration
//! samples sit behind a mutex that is touched only on successful
//! forwards and on snapshot. Samples accumulate for the process lifetime
//! (no sampling window), so the reported mean is an all‑time mean.
use std::sync::{
    Mutex,
    atomic::{AtomicU64, Ordering},
};

/// Point-in-time view of the accumulated metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub errors_total: u64,
    /// Arithmetic mean of recorded durations, 0.0 when none recorded.
    pub avg_request_duration_ms: f64,
}

/// Shared metrics accumulator owned by the gateway.
#[derive(Debug, Default)]
pub struct GatewayMetrics {
    requests_total: AtomicU64,
    errors_total: AtomicU64,
    durations_ms: Mutex<Vec<f64>>,
}

impl GatewayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an incoming request, before any pipeline decision.
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a forwarding failure.
    pub fn record_error(&self) {
        self.errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the wall-clock duration of a successfully forwarded request.
    pub fn record_duration(&self, duration_ms: f64) {
        if let Ok(mut durations) = self.durations_ms.lock() {
            durations.push(duration_ms);
        } else {
            tracing::error!("Failed to acquire lock for duration samples");
        }
    }

    pub fn requests_total(&self) -> u64 {
        self.requests_total.load(Ordering::Relaxed)
    }

    pub fn errors_total(&self) -> u64 {
        self.errors_total.load(Ordering::Relaxed)
    }

    /// Capture a consistent-enough view for reporting. Counters and the
    /// mean are read independently; exactness across the two is not a
    /// guarantee of this accumulator.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let avg = match self.durations_ms.lock() {
            Ok(durations) if !durations.is_empty() => {
                durations.iter().sum::<f64>() / durations.len() as f64
            }
            _ => 0.0,
        };

        MetricsSnapshot {
            requests_total: self.requests_total(),
            errors_total: self.errors_total(),
            avg_request_duration_ms: avg,
        }
    }
}
