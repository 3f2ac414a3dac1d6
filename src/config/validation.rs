use std::collections::HashSet;

use eyre::Result;
use url::Url;

use crate::config::models::{GatewayConfig, RateLimitConfig};

/// Validation result type alias
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error types
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Invalid upstream URL '{url}' for '{name}': {reason}")]
    InvalidUpstreamUrl {
        name: String,
        url: String,
        reason: String,
    },

    #[error("Route conflict detected: {message}")]
    RouteConflict { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },
}

/// Gateway configuration validator
pub struct GatewayConfigValidator;

impl GatewayConfigValidator {
    /// Validate the entire gateway configuration
    pub fn validate(config: &GatewayConfig) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_rate_limit(&config.rate_limit) {
            errors.push(e);
        }

        for (name, base_url) in &config.upstreams {
            if let Err(e) = Self::validate_upstream(name, base_url) {
                errors.push(e);
            }
        }

        let mut seen_prefixes = HashSet::new();
        for entry in &config.routes {
            if let Err(e) = Self::validate_route_entry(&entry.prefix, &entry.upstream) {
                errors.push(e);
            }
            if !seen_prefixes.insert(entry.prefix.clone()) {
                errors.push(ValidationError::RouteConflict {
                    message: format!("duplicate route prefix '{}'", entry.prefix),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::ValidationFailed {
                message: Self::format_multiple_errors(errors),
            })
        }
    }

    /// Validate a single route registration input. Also used by the route
    /// table at registration time, so ad-hoc registrations get the same
    /// checks as config-declared routes.
    pub fn validate_route_entry(prefix: &str, upstream: &str) -> ValidationResult<()> {
        if prefix.is_empty() {
            return Err(ValidationError::MissingField {
                field: "prefix".to_string(),
            });
        }
        if upstream.is_empty() {
            return Err(ValidationError::MissingField {
                field: "upstream".to_string(),
            });
        }
        if !prefix.starts_with('/') {
            return Err(ValidationError::InvalidField {
                field: format!("route prefix: {prefix}"),
                message: "Route prefixes must start with '/'".to_string(),
            });
        }
        Ok(())
    }

    fn validate_rate_limit(rate_limit: &RateLimitConfig) -> ValidationResult<()> {
        if rate_limit.window_ms <= 0 {
            return Err(ValidationError::InvalidField {
                field: "rate_limit.window_ms".to_string(),
                message: "Window must be a positive number of milliseconds".to_string(),
            });
        }
        if rate_limit.max == 0 {
            return Err(ValidationError::InvalidField {
                field: "rate_limit.max".to_string(),
                message: "Maximum requests per window must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    fn validate_upstream(name: &str, base_url: &str) -> ValidationResult<()> {
        if name.is_empty() {
            return Err(ValidationError::MissingField {
                field: "upstreams (name)".to_string(),
            });
        }
        match Url::parse(base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
            Ok(url) => Err(ValidationError::InvalidUpstreamUrl {
                name: name.to_string(),
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => Err(ValidationError::InvalidUpstreamUrl {
                name: name.to_string(),
                url: base_url.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Format multiple validation errors into a single message
    fn format_multiple_errors(errors: Vec<ValidationError>) -> String {
        errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("  {}. {e}", i + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::models::GatewayConfig;

    #[test]
    fn test_valid_config() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .route("/api", "svc1")
            .build();
        assert!(GatewayConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let result = GatewayConfigValidator::validate_route_entry("", "svc1");
        assert_eq!(
            result,
            Err(ValidationError::MissingField {
                field: "prefix".to_string()
            })
        );
    }

    #[test]
    fn test_empty_upstream_rejected() {
        let result = GatewayConfigValidator::validate_route_entry("/api", "");
        assert_eq!(
            result,
            Err(ValidationError::MissingField {
                field: "upstream".to_string()
            })
        );
    }

    #[test]
    fn test_prefix_must_be_absolute() {
        let result = GatewayConfigValidator::validate_route_entry("api", "svc1");
        assert!(matches!(result, Err(ValidationError::InvalidField { .. })));
    }

    #[test]
    fn test_invalid_upstream_url() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "not a url")
            .build();
        let result = GatewayConfigValidator::validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = GatewayConfig::builder().rate_limit(0, 10).build();
        assert!(GatewayConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_route_prefix_rejected() {
        let config = GatewayConfig::builder()
            .upstream("svc1", "http://localhost:3001")
            .route("/api", "svc1")
            .route("/api", "svc1")
            .build();
        assert!(GatewayConfigValidator::validate(&config).is_err());
    }
}
