//! Registry of service types by name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::service::ServiceDefinition;

/// Service types a host can construct, keyed by name.
#[derive(Default, Clone)]
pub struct ServiceCatalog {
    services: HashMap<String, Arc<dyn ServiceDefinition>>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service type. Names must be unique.
    pub fn register<D>(&mut self, service: D) -> Result<(), ConfigurationError>
    where
        D: ServiceDefinition + 'static,
    {
        let name = service.name().to_string();
        if self.services.contains_key(&name) {
            return Err(ConfigurationError::DuplicateService(name));
        }
        tracing::debug!(service = %name, "Service type registered");
        self.services.insert(name, Arc::new(service));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with<D>(mut self, service: D) -> Result<Self, ConfigurationError>
    where
        D: ServiceDefinition + 'static,
    {
        self.register(service)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ServiceDefinition>> {
        self.services.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for ServiceCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceCatalog")
            .field("services", &self.services.keys().collect::<Vec<_>>())
            .finish()
    }
}
