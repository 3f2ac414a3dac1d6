//! Insertion‑ordered route table with literal prefix matching.
//!
//! Lookup scans routes in registration order and returns the first whose
//! prefix is a literal prefix of the request path. The tie‑break is
//! therefore **first registered wins**, not longest match: a short prefix
//! registered early shadows a longer, more specific prefix registered
//! later. Re‑registering a prefix overwrites the entry in place, keeping
//! its original position in the scan order.
use chrono::{DateTime, Utc};

use crate::config::validation::{GatewayConfigValidator, ValidationResult};

/// A registered route binding a path prefix to a named upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path_prefix: String,
    pub upstream: String,
    pub registered_at: DateTime<Utc>,
}

/// Ordered collection of routes. Routes are never removed.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a route, overwriting any existing entry for the same
    /// prefix without changing its position in the match order.
    pub fn register(
        &mut self,
        path_prefix: impl Into<String>,
        upstream: impl Into<String>,
    ) -> ValidationResult<()> {
        let path_prefix = path_prefix.into();
        let upstream = upstream.into();

        GatewayConfigValidator::validate_route_entry(&path_prefix, &upstream)?;

        let route = Route {
            path_prefix: path_prefix.clone(),
            upstream: upstream.clone(),
            registered_at: Utc::now(),
        };

        match self
            .routes
            .iter_mut()
            .find(|r| r.path_prefix == path_prefix)
        {
            Some(existing) => *existing = route,
            None => self.routes.push(route),
        }

        tracing::info!(prefix = %path_prefix, upstream = %upstream, "Route registered");
        Ok(())
    }

    /// Find the first registered route whose prefix is a literal prefix
    /// of `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| path.starts_with(&r.path_prefix))
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::ValidationError;

    #[test]
    fn test_first_registered_prefix_wins() {
        let mut table = RouteTable::new();
        table.register("/api", "svc1").unwrap();
        table.register("/api/v2", "svc2").unwrap();

        // The shorter, earlier prefix shadows the more specific one.
        let route = table.lookup("/api/v2/users").unwrap();
        assert_eq!(route.upstream, "svc1");
    }

    #[test]
    fn test_registration_order_decides_match() {
        let mut table = RouteTable::new();
        table.register("/api/v2", "svc2").unwrap();
        table.register("/api", "svc1").unwrap();

        let route = table.lookup("/api/v2/users").unwrap();
        assert_eq!(route.upstream, "svc2");

        let route = table.lookup("/api/v1/users").unwrap();
        assert_eq!(route.upstream, "svc1");
    }

    #[test]
    fn test_lookup_no_match() {
        let mut table = RouteTable::new();
        table.register("/api", "svc1").unwrap();
        assert!(table.lookup("/other").is_none());
    }

    #[test]
    fn test_reregister_overwrites_in_place() {
        let mut table = RouteTable::new();
        table.register("/api", "svc1").unwrap();
        table.register("/admin", "svc2").unwrap();
        table.register("/api", "svc3").unwrap();

        assert_eq!(table.len(), 2);
        // Still matched before /admin despite being re-registered later.
        let route = table.lookup("/api/users").unwrap();
        assert_eq!(route.upstream, "svc3");
    }

    #[test]
    fn test_register_rejects_empty_fields() {
        let mut table = RouteTable::new();
        assert!(matches!(
            table.register("", "svc1"),
            Err(ValidationError::MissingField { .. })
        ));
        assert!(matches!(
            table.register("/api", ""),
            Err(ValidationError::MissingField { .. })
        ));
        assert!(table.is_empty());
    }
}
