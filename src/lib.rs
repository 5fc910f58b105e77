//! Declarative HTTP hosting for plain Rust service types.
//!
//! Route descriptors name a service type, an entry point and its typed
//! parameters. The host validates them into a route table at startup and,
//! per request, binds arguments, runs a fresh instance through
//! setup → entry point → teardown, and writes the result as the body.

pub mod builtin;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod service;

pub use config::HostConfig;
pub use error::{BindingError, ConfigurationError, DispatchError, LifecycleFault, Phase};
pub use http::{HostError, ServiceHost};
pub use lifecycle::Shutdown;
pub use routing::{Descriptor, HttpVerb};
pub use service::{ScalarKind, ServiceCatalog, ServiceType};
