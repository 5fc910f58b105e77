//! Route descriptors.
//!
//! # Responsibilities
//! - Describe one route: service, methods, verb, path, parameters, result
//! - Parse verbs and kinds from their textual names
//! - Build descriptors from configuration entries
//!
//! # Design Decisions
//! - Descriptors are plain data; validation happens at registration
//! - Verbs form a closed set (GET, POST, PUT, DELETE)

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::config::RouteConfig;
use crate::error::ConfigurationError;
use crate::service::ScalarKind;

/// HTTP verbs a route can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpVerb {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Delete => "DELETE",
        }
    }

    pub fn method_filter(self) -> MethodFilter {
        match self {
            HttpVerb::Get => MethodFilter::GET,
            HttpVerb::Post => MethodFilter::POST,
            HttpVerb::Put => MethodFilter::PUT,
            HttpVerb::Delete => MethodFilter::DELETE,
        }
    }

    /// Map a request method onto a verb. Anything else is unroutable.
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(HttpVerb::Get),
            Method::POST => Some(HttpVerb::Post),
            Method::PUT => Some(HttpVerb::Put),
            Method::DELETE => Some(HttpVerb::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "DELETE" => Ok(HttpVerb::Delete),
            _ => Err(ConfigurationError::UnsupportedVerb(s.to_string())),
        }
    }
}

/// A named, typed parameter of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ScalarKind,
}

/// Declarative recipe binding a (route, verb) pair to a service method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Name of the service type in the catalog.
    pub service: String,
    pub entry_point: String,
    pub setup: Option<String>,
    pub teardown: Option<String>,
    pub verb: HttpVerb,
    /// Literal path, e.g. `/echo_querystring`.
    pub route: String,
    /// Call signature in binding order.
    pub parameters: Vec<ParameterSpec>,
    /// Expected result kind. `None` accepts whatever the method returns.
    pub result: Option<ScalarKind>,
}

impl Descriptor {
    pub fn new(
        service: impl Into<String>,
        entry_point: impl Into<String>,
        verb: HttpVerb,
        route: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            entry_point: entry_point.into(),
            setup: None,
            teardown: None,
            verb,
            route: route.into(),
            parameters: Vec::new(),
            result: None,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, kind: ScalarKind) -> Self {
        self.parameters.push(ParameterSpec {
            name: name.into(),
            kind,
        });
        self
    }

    pub fn with_setup(mut self, method: impl Into<String>) -> Self {
        self.setup = Some(method.into());
        self
    }

    pub fn with_teardown(mut self, method: impl Into<String>) -> Self {
        self.teardown = Some(method.into());
        self
    }

    pub fn returning(mut self, kind: ScalarKind) -> Self {
        self.result = Some(kind);
        self
    }
}

impl TryFrom<&RouteConfig> for Descriptor {
    type Error = ConfigurationError;

    fn try_from(config: &RouteConfig) -> Result<Self, Self::Error> {
        let mut descriptor = Descriptor::new(
            config.service.clone(),
            config.entry_point.clone(),
            config.method.parse()?,
            config.route.clone(),
        );
        descriptor.setup = config.setup.clone();
        descriptor.teardown = config.teardown.clone();
        for parameter in &config.parameters {
            descriptor = descriptor.with_parameter(parameter.name.clone(), parameter.kind.parse()?);
        }
        if let Some(result) = &config.result {
            descriptor = descriptor.returning(result.parse()?);
        }
        Ok(descriptor)
    }
}
