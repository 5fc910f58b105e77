//! Error taxonomy for registration and request dispatch.

use std::fmt;

use thiserror::Error;

use crate::routing::HttpVerb;
use crate::service::ScalarKind;

/// Raised while registering descriptors. Fatal to startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Two descriptors share the same (route, verb) key.
    #[error("route {verb} {route} is registered more than once")]
    DuplicateRoute { route: String, verb: HttpVerb },

    /// Route is not a literal absolute path.
    #[error("route `{0}` is not a literal absolute path")]
    InvalidRoute(String),

    #[error("unsupported HTTP verb `{0}`")]
    UnsupportedVerb(String),

    #[error("unsupported type `{0}`")]
    UnsupportedType(String),

    #[error("service `{0}` is not registered")]
    UnknownService(String),

    #[error("service `{0}` is registered more than once")]
    DuplicateService(String),

    #[error("service `{service}` has no method `{method}`")]
    UnknownMethod { service: String, method: String },

    /// Method exists but its argument count differs from the descriptor.
    #[error("method `{service}.{method}` takes {actual} argument(s), descriptor declares {expected}")]
    ArityMismatch {
        service: String,
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("parameter `{parameter}` of `{service}.{method}` is declared {declared} but the method takes {actual}")]
    ParameterTypeMismatch {
        service: String,
        method: String,
        parameter: String,
        declared: ScalarKind,
        actual: ScalarKind,
    },

    #[error("`{service}.{method}` returns {actual}, descriptor expects {declared}")]
    ResultTypeMismatch {
        service: String,
        method: String,
        declared: ScalarKind,
        actual: ScalarKind,
    },

    #[error("parameter `{0}` cannot be declared void")]
    VoidParameter(String),
}

/// A declared parameter could not be produced from the request.
#[derive(Debug, Clone, Error)]
pub enum BindingError {
    #[error("missing required parameter `{0}`")]
    Missing(String),

    #[error("parameter `{name}` expects {kind}, got `{value}`")]
    Invalid {
        name: String,
        kind: ScalarKind,
        value: String,
    },

    #[error("request body could not be read: {0}")]
    UnreadableBody(String),
}

/// Point of the per-request lifecycle a fault was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Construct,
    Setup,
    EntryPoint,
    Teardown,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Construct => "construct",
            Phase::Setup => "setup",
            Phase::EntryPoint => "entry_point",
            Phase::Teardown => "teardown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A service method (or constructor) failed or panicked.
#[derive(Debug, Clone, Error)]
#[error("{phase} of `{service}` failed: {message}")]
pub struct LifecycleFault {
    pub service: String,
    pub phase: Phase,
    pub message: String,
}

/// Any per-request failure. Always recovered into a 500 response.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleFault),

    /// The worker running the lifecycle was lost (e.g. cancelled).
    #[error("request worker aborted: {0}")]
    Aborted(String),
}
