//! Route table: (path, verb) → validated descriptor.
//!
//! # Responsibilities
//! - Validate descriptors against the service catalog at registration
//! - Reject duplicate (path, verb) keys
//! - Look up the route for an incoming (path, verb)
//!
//! # Design Decisions
//! - Built once at startup, read-only afterwards (shared via Arc, no locks)
//! - Paths are literal; no patterns, no prefix fallback
//! - Verbs never fall back to each other on the same path

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::routing::descriptor::{Descriptor, HttpVerb};
use crate::service::{Recipe, ServiceCatalog};

/// A descriptor whose methods have been resolved.
pub struct RegisteredRoute {
    pub descriptor: Descriptor,
    pub(crate) recipe: Arc<dyn Recipe>,
}

impl std::fmt::Debug for RegisteredRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRoute")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Registry of routes keyed by literal path, then verb.
#[derive(Debug)]
pub struct RouteTable {
    catalog: Arc<ServiceCatalog>,
    routes: HashMap<String, HashMap<HttpVerb, Arc<RegisteredRoute>>>,
}

impl RouteTable {
    pub fn new(catalog: Arc<ServiceCatalog>) -> Self {
        Self {
            catalog,
            routes: HashMap::new(),
        }
    }

    /// Build a table from a descriptor list, failing on the first bad entry.
    pub fn build<I>(catalog: Arc<ServiceCatalog>, descriptors: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        let mut table = Self::new(catalog);
        for descriptor in descriptors {
            table.register(descriptor)?;
        }
        Ok(table)
    }

    /// Validate and add a descriptor.
    pub fn register(&mut self, descriptor: Descriptor) -> Result<(), ConfigurationError> {
        validate_route(&descriptor.route)?;

        if self.lookup(&descriptor.route, descriptor.verb).is_some() {
            return Err(ConfigurationError::DuplicateRoute {
                route: descriptor.route,
                verb: descriptor.verb,
            });
        }

        let service = self
            .catalog
            .get(&descriptor.service)
            .ok_or_else(|| ConfigurationError::UnknownService(descriptor.service.clone()))?;
        let recipe = service.resolve(&descriptor)?;

        tracing::info!(
            route = %descriptor.route,
            verb = %descriptor.verb,
            service = %descriptor.service,
            entry_point = %descriptor.entry_point,
            "Route registered"
        );

        let verb = descriptor.verb;
        self.routes
            .entry(descriptor.route.clone())
            .or_default()
            .insert(verb, Arc::new(RegisteredRoute { descriptor, recipe }));
        Ok(())
    }

    /// Exact match on (path, verb). `None` means not found.
    pub fn lookup(&self, path: &str, verb: HttpVerb) -> Option<&Arc<RegisteredRoute>> {
        self.routes.get(path)?.get(&verb)
    }

    /// Registered paths with their verbs.
    pub fn paths(&self) -> impl Iterator<Item = (&str, Vec<HttpVerb>)> {
        self.routes.iter().map(|(path, verbs)| {
            let mut verbs: Vec<HttpVerb> = verbs.keys().copied().collect();
            verbs.sort();
            (path.as_str(), verbs)
        })
    }

    /// Number of (path, verb) entries.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A route must be an absolute literal path the HTTP router will not treat
/// as a pattern.
fn validate_route(route: &str) -> Result<(), ConfigurationError> {
    let literal = route.starts_with('/')
        && !route.contains(['{', '}'])
        && !route
            .split('/')
            .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
    if literal {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidRoute(route.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{ScalarKind, ServiceType};

    #[derive(Default)]
    struct Case;

    impl Case {
        fn upper(&mut self, text: String) -> String {
            text.to_uppercase()
        }

        fn lower(&mut self, text: String) -> String {
            text.to_lowercase()
        }
    }

    fn catalog() -> Arc<ServiceCatalog> {
        let catalog = ServiceCatalog::new()
            .with(
                ServiceType::new("case", Case::default)
                    .method("ToUpper", Case::upper)
                    .method("ToLower", Case::lower),
            )
            .unwrap();
        Arc::new(catalog)
    }

    fn changecase(verb: HttpVerb, entry_point: &str) -> Descriptor {
        Descriptor::new("case", entry_point, verb, "/changecase")
            .with_parameter("text", ScalarKind::String)
            .returning(ScalarKind::String)
    }

    #[test]
    fn test_distinct_verbs_same_path() {
        let table = RouteTable::build(
            catalog(),
            [
                changecase(HttpVerb::Get, "ToUpper"),
                changecase(HttpVerb::Post, "ToLower"),
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let get = table.lookup("/changecase", HttpVerb::Get).unwrap();
        assert_eq!(get.descriptor.entry_point, "ToUpper");
        let post = table.lookup("/changecase", HttpVerb::Post).unwrap();
        assert_eq!(post.descriptor.entry_point, "ToLower");

        assert!(table.lookup("/changecase", HttpVerb::Put).is_none());
        assert!(table.lookup("/changecase/", HttpVerb::Get).is_none());
        assert!(table.lookup("/other", HttpVerb::Get).is_none());

        let paths: Vec<_> = table.paths().collect();
        assert_eq!(paths, vec![("/changecase", vec![HttpVerb::Get, HttpVerb::Post])]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut table = RouteTable::new(catalog());
        table.register(changecase(HttpVerb::Get, "ToUpper")).unwrap();

        let err = table.register(changecase(HttpVerb::Get, "ToLower")).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateRoute { verb: HttpVerb::Get, .. }));

        // The first registration is untouched.
        let get = table.lookup("/changecase", HttpVerb::Get).unwrap();
        assert_eq!(get.descriptor.entry_point, "ToUpper");
    }

    #[test]
    fn test_unknown_service_and_method() {
        let mut table = RouteTable::new(catalog());

        let err = table
            .register(Descriptor::new("nope", "ToUpper", HttpVerb::Get, "/x"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownService(_)));

        let err = table
            .register(Descriptor::new("case", "XYZ", HttpVerb::Get, "/echo_querystring"))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownMethod { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_route_must_be_literal() {
        for route in ["changecase", "/users/{id}", "/files/*rest", "/users/:id", ""] {
            let mut table = RouteTable::new(catalog());
            let mut descriptor = changecase(HttpVerb::Get, "ToUpper");
            descriptor.route = route.to_string();
            let err = table.register(descriptor).unwrap_err();
            assert!(matches!(err, ConfigurationError::InvalidRoute(_)), "{route}");
        }
    }
}
