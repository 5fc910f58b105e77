//! Dispatch engine.
//!
//! # Data Flow
//! ```text
//! (path, verb, RequestParams)
//!     → RouteTable::lookup ── none ──→ 404
//!     → binder.rs (named values → ordered typed arguments)
//!     → invoker.rs (construct → setup → entry point → teardown)
//!     → translator.rs (value → 200 / failure → 500)
//! ```
//!
//! # Design Decisions
//! - Synchronous: service methods may block, the host runs dispatch on a
//!   blocking worker
//! - No state shared between requests besides the read-only route table

pub mod binder;
pub mod invoker;
pub mod translator;

use std::sync::Arc;

use crate::error::DispatchError;
use crate::observability::metrics;
use crate::routing::{HttpVerb, RegisteredRoute, RouteTable};

pub use binder::{bind, RequestParams};
pub use invoker::{invoke, LifecycleObserver, Outcome, Stage, TracingObserver};
pub use translator::{not_found, translate, DispatchResponse};

/// Runs bind → invoke → translate against a frozen route table.
pub struct Dispatcher {
    table: Arc<RouteTable>,
    observer: Arc<dyn LifecycleObserver>,
}

impl Dispatcher {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self::with_observer(table, Arc::new(TracingObserver))
    }

    pub fn with_observer(table: Arc<RouteTable>, observer: Arc<dyn LifecycleObserver>) -> Self {
        Self { table, observer }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Look up (path, verb) and handle the request, or answer 404.
    pub fn dispatch(&self, path: &str, verb: HttpVerb, request: &RequestParams) -> DispatchResponse {
        match self.table.lookup(path, verb) {
            Some(route) => self.handle(route, request),
            None => {
                tracing::debug!(path = %path, verb = %verb, "No route matched");
                not_found()
            }
        }
    }

    /// Handle a request for an already matched route.
    pub fn handle(&self, route: &RegisteredRoute, request: &RequestParams) -> DispatchResponse {
        let descriptor = &route.descriptor;
        let result = bind(&descriptor.parameters, request)
            .map_err(DispatchError::from)
            .and_then(|args| {
                invoke(route, args, self.observer.as_ref())
                    .into_result()
                    .map_err(|fault| {
                        metrics::record_lifecycle_fault(fault.phase);
                        DispatchError::from(fault)
                    })
            });
        translate(result)
    }
}
