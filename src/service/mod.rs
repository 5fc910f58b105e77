//! Service types exposed through routes.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     ServiceType<S> (constructor + named methods)
//!     → ServiceCatalog (by service name)
//!     → resolve(descriptor): look up entry point / setup / teardown,
//!       check arity and kinds
//!     → Recipe (frozen method handles)
//!
//! Per request:
//!     Recipe::construct() → fresh Lifecycle instance
//!     → setup / invoke(args) / teardown
//!     → dropped with the response
//! ```
//!
//! # Design Decisions
//! - Methods are resolved by name once, never per request
//! - Instances are never reused; state cannot leak between requests
//! - Service types only need a no-argument constructor closure

pub mod catalog;
pub mod method;
pub mod value;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::routing::Descriptor;

pub use catalog::ServiceCatalog;
pub use method::{Fault, IntoOutcome, ServiceMethod, Signature};
pub use value::{Scalar, ScalarKind, Value};

use method::MethodCall;

/// A service type as seen by the route table.
pub trait ServiceDefinition: Send + Sync {
    fn name(&self) -> &str;

    /// Resolve the descriptor's method names into callable handles.
    fn resolve(&self, descriptor: &Descriptor) -> Result<Arc<dyn Recipe>, ConfigurationError>;
}

/// Resolved handles for one route.
pub trait Recipe: Send + Sync {
    /// Build a fresh instance. May panic if the service constructor does.
    fn construct(&self) -> Box<dyn Lifecycle>;
}

/// One request's service instance.
///
/// `setup` and `teardown` are no-ops when the route declares none.
pub trait Lifecycle {
    fn setup(&mut self) -> Result<(), Fault>;

    fn invoke(&mut self, args: Vec<Value>) -> Result<Value, Fault>;

    fn teardown(&mut self) -> Result<(), Fault>;
}

struct MethodEntry<S> {
    signature: Signature,
    call: MethodCall<S>,
}

/// A concrete service type: a constructor plus named methods.
///
/// ```
/// use servicehost::service::ServiceType;
///
/// #[derive(Default)]
/// struct Greeter;
///
/// impl Greeter {
///     fn greet(&mut self, name: String) -> String {
///         format!("Hello {name}!")
///     }
/// }
///
/// let greeter = ServiceType::new("greeter", Greeter::default)
///     .method("Greet", Greeter::greet);
/// assert!(greeter.has_method("Greet"));
/// ```
pub struct ServiceType<S> {
    name: String,
    constructor: Arc<dyn Fn() -> S + Send + Sync>,
    methods: HashMap<String, MethodEntry<S>>,
}

impl<S: 'static> ServiceType<S> {
    /// Create a service type with a no-argument constructor.
    pub fn new<C>(name: impl Into<String>, constructor: C) -> Self
    where
        C: Fn() -> S + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            constructor: Arc::new(constructor),
            methods: HashMap::new(),
        }
    }

    /// Expose a method under `name`. A later registration under the same
    /// name replaces the earlier one.
    pub fn method<M, Args>(mut self, name: impl Into<String>, method: M) -> Self
    where
        M: ServiceMethod<S, Args>,
        Args: 'static,
    {
        let signature = method.signature();
        let call: MethodCall<S> = Arc::new(move |instance: &mut S, args| method.call(instance, args));
        self.methods.insert(name.into(), MethodEntry { signature, call });
        self
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn lookup(&self, method: &str) -> Result<&MethodEntry<S>, ConfigurationError> {
        self.methods
            .get(method)
            .ok_or_else(|| ConfigurationError::UnknownMethod {
                service: self.name.clone(),
                method: method.to_string(),
            })
    }

    fn resolve_hook(&self, method: Option<&str>) -> Result<Option<MethodCall<S>>, ConfigurationError> {
        let Some(method) = method else {
            return Ok(None);
        };
        let entry = self.lookup(method)?;
        if !entry.signature.parameters.is_empty() {
            return Err(ConfigurationError::ArityMismatch {
                service: self.name.clone(),
                method: method.to_string(),
                expected: 0,
                actual: entry.signature.parameters.len(),
            });
        }
        Ok(Some(entry.call.clone()))
    }
}

impl<S: 'static> ServiceDefinition for ServiceType<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn resolve(&self, descriptor: &Descriptor) -> Result<Arc<dyn Recipe>, ConfigurationError> {
        let method = descriptor.entry_point.as_str();
        let entry = self.lookup(method)?;

        if entry.signature.parameters.len() != descriptor.parameters.len() {
            return Err(ConfigurationError::ArityMismatch {
                service: self.name.clone(),
                method: method.to_string(),
                expected: descriptor.parameters.len(),
                actual: entry.signature.parameters.len(),
            });
        }

        for (declared, actual) in descriptor.parameters.iter().zip(&entry.signature.parameters) {
            if declared.kind == ScalarKind::Void {
                return Err(ConfigurationError::VoidParameter(declared.name.clone()));
            }
            if declared.kind != *actual {
                return Err(ConfigurationError::ParameterTypeMismatch {
                    service: self.name.clone(),
                    method: method.to_string(),
                    parameter: declared.name.clone(),
                    declared: declared.kind,
                    actual: *actual,
                });
            }
        }

        if let Some(declared) = descriptor.result {
            if declared != entry.signature.result {
                return Err(ConfigurationError::ResultTypeMismatch {
                    service: self.name.clone(),
                    method: method.to_string(),
                    declared,
                    actual: entry.signature.result,
                });
            }
        }

        Ok(Arc::new(ResolvedService {
            constructor: self.constructor.clone(),
            setup: self.resolve_hook(descriptor.setup.as_deref())?,
            entry_point: entry.call.clone(),
            teardown: self.resolve_hook(descriptor.teardown.as_deref())?,
        }))
    }
}

struct ResolvedService<S> {
    constructor: Arc<dyn Fn() -> S + Send + Sync>,
    setup: Option<MethodCall<S>>,
    entry_point: MethodCall<S>,
    teardown: Option<MethodCall<S>>,
}

impl<S: 'static> Recipe for ResolvedService<S> {
    fn construct(&self) -> Box<dyn Lifecycle> {
        Box::new(Instance {
            state: (self.constructor)(),
            setup: self.setup.clone(),
            entry_point: self.entry_point.clone(),
            teardown: self.teardown.clone(),
        })
    }
}

struct Instance<S> {
    state: S,
    setup: Option<MethodCall<S>>,
    entry_point: MethodCall<S>,
    teardown: Option<MethodCall<S>>,
}

impl<S> Lifecycle for Instance<S> {
    fn setup(&mut self) -> Result<(), Fault> {
        match &self.setup {
            Some(call) => call(&mut self.state, Vec::new()).map(drop),
            None => Ok(()),
        }
    }

    fn invoke(&mut self, args: Vec<Value>) -> Result<Value, Fault> {
        (self.entry_point)(&mut self.state, args)
    }

    fn teardown(&mut self) -> Result<(), Fault> {
        match &self.teardown {
            Some(call) => call(&mut self.state, Vec::new()).map(drop),
            None => Ok(()),
        }
    }
}
