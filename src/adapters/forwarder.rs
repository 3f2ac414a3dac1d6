use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

use crate::{
    config::models::GatewayConfig,
    core::gateway::{RequestDescriptor, ResponseDescriptor},
    ports::forwarder::{ForwardError, ForwardResult, Forwarder},
};

/// Stand‑in forwarding adapter.
///
/// Resolves the upstream name against the configured name → base URL
/// mapping, then fabricates a 200 acknowledgement instead of performing
/// a network call. Resolution failures surface as
/// [`ForwardError::UnknownUpstream`], which the pipeline maps to 502.
///
/// A real transport (HTTP client, timeouts, retry/error mapping policy)
/// is a separate adapter behind the same [`Forwarder`] port; swapping it
/// in changes observable behavior and is deliberately out of this
/// crate's scope.
pub struct StubForwarder {
    upstreams: HashMap<String, String>,
}

impl StubForwarder {
    /// Create a stub forwarder resolving against the config's upstreams.
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            upstreams: config.upstreams.clone(),
        }
    }
}

#[async_trait]
impl Forwarder for StubForwarder {
    async fn forward(
        &self,
        upstream: &str,
        request: &RequestDescriptor,
    ) -> ForwardResult<ResponseDescriptor> {
        let base_url = self
            .upstreams
            .get(upstream)
            .ok_or_else(|| ForwardError::UnknownUpstream(upstream.to_string()))?;

        tracing::debug!(
            upstream = %upstream,
            base_url = %base_url,
            method = %request.method,
            path = %request.path,
            "Dispatching to upstream (stub, no network I/O)"
        );

        let mut headers = HashMap::new();
        headers.insert(
            "X-Gateway-Timestamp".to_string(),
            Utc::now().to_rfc3339(),
        );

        Ok(ResponseDescriptor {
            status: 200,
            body: json!({ "forwarded": true, "upstream": upstream }),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RequestDescriptor {
        RequestDescriptor {
            method: "GET".to_string(),
            path: "/api/users".to_string(),
            client_ip: "10.0.0.1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_known_upstream_acknowledges() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .build();
        let forwarder = StubForwarder::new(&config);

        let response = forwarder.forward("svc1", &request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({ "forwarded": true, "upstream": "svc1" })
        );
        assert!(response.headers.contains_key("X-Gateway-Timestamp"));
    }

    #[tokio::test]
    async fn test_unknown_upstream_fails() {
        let config = GatewayConfig::default();
        let forwarder = StubForwarder::new(&config);

        let result = forwarder.forward("missing", &request()).await;
        assert!(matches!(result, Err(ForwardError::UnknownUpstream(name)) if name == "missing"));
    }
}
