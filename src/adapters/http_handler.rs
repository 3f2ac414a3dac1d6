use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Body as AxumBody,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
};
use eyre::{Result, WrapErr};
use http::{Request, Response};

use crate::core::gateway::{Gateway, RequestDescriptor, ResponseDescriptor};

/// HTTP handler for the Portico gateway.
///
/// Serves the reserved `/health` and `/metrics` endpoints from the
/// gateway's reports and feeds every other request through the core
/// pipeline, translating between HTTP types and the pipeline's
/// descriptors.
pub struct GatewayHttpHandler {
    gateway: Arc<Gateway>,
}

impl GatewayHttpHandler {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    /// Main request handler that routes requests appropriately
    pub async fn handle_request(
        &self,
        req: Request<AxumBody>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<AxumBody>, eyre::Error> {
        let path = req.uri().path();

        match path {
            "/health" => self.handle_health().await,
            "/metrics" => self.handle_metrics().await,
            _ => self.handle_pipeline_request(req, client_addr).await,
        }
    }

    /// Handle health check endpoint
    async fn handle_health(&self) -> Result<Response<AxumBody>, eyre::Error> {
        let report = self.gateway.health();
        let body = serde_json::to_string(&report).wrap_err("Failed to serialize health report")?;

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body))
            .wrap_err("Failed to build health check response")?;

        Ok(response)
    }

    /// Handle metrics endpoint
    async fn handle_metrics(&self) -> Result<Response<AxumBody>, eyre::Error> {
        let report = self.gateway.metrics();
        let body = serde_json::to_string(&report).wrap_err("Failed to serialize metrics report")?;

        let response = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(AxumBody::from(body))
            .wrap_err("Failed to build metrics response")?;

        Ok(response)
    }

    /// Feed the request through the core pipeline and translate the
    /// resulting descriptor back into an HTTP response.
    async fn handle_pipeline_request(
        &self,
        req: Request<AxumBody>,
        client_addr: Option<SocketAddr>,
    ) -> Result<Response<AxumBody>, eyre::Error> {
        let client_ip = Self::extract_client_ip(req.headers())
            .or_else(|| client_addr.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| "unknown".to_string());

        let descriptor = RequestDescriptor {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            client_ip,
        };

        let response = self.gateway.handle_request(descriptor).await;
        Self::into_http_response(response)
    }

    fn into_http_response(
        descriptor: ResponseDescriptor,
    ) -> Result<Response<AxumBody>, eyre::Error> {
        let status =
            StatusCode::from_u16(descriptor.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut builder = Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json");

        for (name, value) in &descriptor.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    builder = builder.header(name, value);
                }
                _ => {
                    tracing::warn!(header = %name, "Dropping unrepresentable response header");
                }
            }
        }

        builder
            .body(AxumBody::from(descriptor.body.to_string()))
            .wrap_err("Failed to build pipeline response")
    }

    /// Extract client IP from headers or connection info
    fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
        #[allow(clippy::collapsible_if)]
        if let Some(forwarded_for) = headers.get("X-Forwarded-For") {
            if let Ok(value) = forwarded_for.to_str() {
                // Get the first IP in the chain
                return value.split(',').next().map(|ip| ip.trim().to_string());
            }
        }

        #[allow(clippy::collapsible_if)]
        if let Some(real_ip) = headers.get("X-Real-IP") {
            if let Ok(value) = real_ip.to_str() {
                return Some(value.to_string());
            }
        }

        None
    }
}

impl Clone for GatewayHttpHandler {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}
