// Tests for route registration and first-match prefix precedence
#[cfg(test)]
mod test {
    use std::sync::Arc;

    use portico::{
        Gateway, StubForwarder,
        config::{GatewayConfig, ValidationError},
        core::gateway::RequestDescriptor,
    };

    fn build_gateway(config: GatewayConfig) -> Arc<Gateway> {
        let config = Arc::new(config);
        let forwarder = Arc::new(StubForwarder::new(&config));
        Arc::new(Gateway::new(config, forwarder).unwrap())
    }

    fn request(path: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: "GET".to_string(),
            path: path.to_string(),
            client_ip: "10.0.0.1".to_string(),
        }
    }

    fn forwarded_upstream(body: &serde_json::Value) -> Option<&str> {
        body.get("upstream").and_then(|v| v.as_str())
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_first_registered_route_shadows_more_specific_one() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .upstream("svc2", "http://localhost:3002")
            .build();
        let gateway = build_gateway(config);

        gateway.register_route("/api", "svc1").unwrap();
        gateway.register_route("/api/v2", "svc2").unwrap();

        // /api was registered first, so it wins even though /api/v2 is a
        // longer, more specific match.
        let response = gateway.handle_request(request("/api/v2/users")).await;
        assert_eq!(response.status, 200);
        assert_eq!(forwarded_upstream(&response.body), Some("svc1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registration_order_from_config_is_preserved() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .upstream("svc2", "http://localhost:3002")
            .route("/api/v2", "svc2")
            .route("/api", "svc1")
            .build();
        let gateway = build_gateway(config);

        let response = gateway.handle_request(request("/api/v2/users")).await;
        assert_eq!(forwarded_upstream(&response.body), Some("svc2"));

        let response = gateway.handle_request(request("/api/v1/users")).await;
        assert_eq!(forwarded_upstream(&response.body), Some("svc1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reregistering_keeps_match_precedence() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .upstream("svc2", "http://localhost:3002")
            .build();
        let gateway = build_gateway(config);

        gateway.register_route("/api", "svc1").unwrap();
        gateway.register_route("/admin", "svc2").unwrap();
        // Overwrite /api after /admin was registered
        gateway.register_route("/api", "svc2").unwrap();

        let response = gateway.handle_request(request("/api/users")).await;
        assert_eq!(forwarded_upstream(&response.body), Some("svc2"));

        let health = gateway.health();
        assert_eq!(health.routes, 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_registration_rejects_empty_input() {
        let gateway = build_gateway(GatewayConfig::default());

        let err = gateway.register_route("", "svc1").unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));

        let err = gateway.register_route("/api", "").unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_config_route_fails_construction() {
        let config = Arc::new(
            GatewayConfig::builder()
                .upstream("svc1", "http://localhost:3001")
                .route("", "svc1")
                .build(),
        );
        let forwarder = Arc::new(StubForwarder::new(&config));
        assert!(Gateway::new(config, forwarder).is_err());
    }
}
