//! Per‑client fixed‑window rate limiting.
//!
//! A classic fixed‑window counter: each client key owns a window with a
//! request count and an absolute reset time. The counter resets only when
//! a request arrives strictly after `reset_at`, so a request at exactly
//! `reset_at` is still charged to the old window. Denied requests keep
//! incrementing the counter until rollover, and a burst straddling the
//! boundary can admit up to 2x `max`. Windows are never evicted, so the
//! table grows with the number of distinct clients seen over the
//! process lifetime.
use scc::HashMap;

use crate::config::models::RateLimitConfig;

/// One client's window state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    count: u64,
    reset_at: i64,
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request is allowed through.
    pub allowed: bool,
    /// The client's request count within the current window, including
    /// this request.
    pub count: u64,
    /// Unix milliseconds at which the current window expires.
    pub reset_at: i64,
}

/// Fixed‑window limiter keyed by client identifier (typically an IP
/// string). The concurrent map's entry guard serializes access per key,
/// so counts stay consistent under concurrent requests from one client.
pub struct FixedWindowLimiter {
    window_ms: i64,
    max: u64,
    windows: HashMap<String, Window>,
}

impl FixedWindowLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            window_ms: config.window_ms,
            max: config.max,
            windows: HashMap::new(),
        }
    }

    /// Record a request from `client` at `now_ms` and decide whether it
    /// is allowed. The caller supplies the clock so window boundaries are
    /// deterministic under test.
    pub fn check(&self, client: &str, now_ms: i64) -> Decision {
        let mut entry = self.windows.entry_sync(client.to_string()).or_insert(Window {
            count: 0,
            reset_at: now_ms + self.window_ms,
        });
        let window = entry.get_mut();

        // Rollover is exclusive: a request at exactly `reset_at` stays in
        // the old window.
        if now_ms > window.reset_at {
            window.count = 0;
            window.reset_at = now_ms + self.window_ms;
        }

        window.count += 1;

        Decision {
            allowed: window.count <= self.max,
            count: window.count,
            reset_at: window.reset_at,
        }
    }

    /// Number of distinct client keys currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
