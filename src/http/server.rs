//! HTTP server setup and host lifecycle.
//!
//! # Responsibilities
//! - Validate descriptors into a route table at startup
//! - Register one handler per (path, verb) with Axum
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Run dispatch on blocking workers, write responses
//! - Start on a base address, stop gracefully
//!
//! # Design Decisions
//! - Any configuration error fails the whole startup; nothing is served
//! - Unmatched paths and unmatched verbs both answer 404
//! - Timeouts belong to this layer, never to the dispatch engine

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::{Host, Url};

use crate::config::HostConfig;
use crate::dispatch::{not_found, translate, Dispatcher, LifecycleObserver, TracingObserver};
use crate::error::{ConfigurationError, DispatchError};
use crate::http::request::{read_params, request_id, UuidRequestId};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::{Descriptor, HttpVerb, RouteTable};
use crate::service::ServiceCatalog;

/// Errors raised while starting or stopping a host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("invalid base address `{0}`")]
    InvalidBaseAddress(String),

    #[error("failed to bind: {0}")]
    Bind(std::io::Error),

    #[error("host is already running")]
    AlreadyRunning,

    #[error("host is not running")]
    NotRunning,

    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Where a host listens, and the path prefix its routes live under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseAddress {
    pub host: String,
    pub port: u16,
    /// Non-root path of the base address, without a trailing slash.
    pub prefix: Option<String>,
}

/// Parse `http://host:port[/prefix]`. A bare `host:port` is accepted too.
pub fn parse_base_address(address: &str) -> Result<BaseAddress, HostError> {
    let invalid = || HostError::InvalidBaseAddress(address.to_string());

    // Url percent-encodes braces, so they must be caught before parsing.
    if address.contains(['{', '}']) {
        return Err(invalid());
    }

    let url = if address.contains("://") {
        Url::parse(address)
    } else {
        Url::parse(&format!("http://{address}"))
    }
    .map_err(|_| invalid())?;

    if url.scheme() != "http" {
        return Err(invalid());
    }
    let host = match url.host().ok_or_else(invalid)? {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => addr.to_string(),
    };
    let port = url.port_or_known_default().ok_or_else(invalid)?;

    let path = url.path().trim_end_matches('/');
    if path.contains(['*', ':']) {
        return Err(invalid());
    }
    let prefix = (!path.is_empty()).then(|| path.to_string());

    Ok(BaseAddress { host, port, prefix })
}

struct RunningHost {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

/// Serves a set of descriptors over HTTP.
pub struct ServiceHost {
    catalog: Arc<ServiceCatalog>,
    config: HostConfig,
    observer: Arc<dyn LifecycleObserver>,
    running: Option<RunningHost>,
}

impl ServiceHost {
    /// Create a host for the given service types.
    pub fn new(catalog: ServiceCatalog, config: HostConfig) -> Self {
        Self {
            catalog: Arc::new(catalog),
            config,
            observer: Arc::new(TracingObserver),
            running: None,
        }
    }

    /// Replace the lifecycle observer used for every request.
    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Bound address while running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.local_addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Register all descriptors and begin accepting requests.
    ///
    /// Returns the bound address (useful with port 0).
    pub async fn start<I>(&mut self, base_address: &str, descriptors: I) -> Result<SocketAddr, HostError>
    where
        I: IntoIterator<Item = Descriptor>,
    {
        if self.running.is_some() {
            return Err(HostError::AlreadyRunning);
        }

        let base = parse_base_address(base_address)?;
        let table = RouteTable::build(self.catalog.clone(), descriptors)?;
        let route_count = table.len();
        let dispatcher = Arc::new(Dispatcher::with_observer(Arc::new(table), self.observer.clone()));
        let router = build_router(dispatcher, &self.config, base.prefix.as_deref());

        let listener = TcpListener::bind((base.host.as_str(), base.port))
            .await
            .map_err(HostError::Bind)?;
        let local_addr = listener.local_addr().map_err(HostError::Bind)?;

        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(Shutdown::wait(signal))
                .await
        });

        tracing::info!(
            address = %local_addr,
            prefix = base.prefix.as_deref().unwrap_or("/"),
            routes = route_count,
            "Service host started"
        );

        self.running = Some(RunningHost {
            local_addr,
            shutdown,
            task,
        });
        Ok(local_addr)
    }

    /// Start on the configured base address with the configured routes.
    pub async fn start_configured(&mut self) -> Result<SocketAddr, HostError> {
        let descriptors = self
            .config
            .routes
            .iter()
            .map(Descriptor::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let base_address = self.config.listener.base_address.clone();
        self.start(&base_address, descriptors).await
    }

    /// Stop accepting requests, drain in-flight ones and release the listener.
    pub async fn stop(&mut self) -> Result<(), HostError> {
        let running = self.running.take().ok_or(HostError::NotRunning)?;
        running.shutdown.trigger();

        let result = match running.task.await {
            Ok(served) => served.map_err(HostError::Serve),
            Err(join) => Err(HostError::Serve(std::io::Error::other(join))),
        };
        tracing::info!(address = %running.local_addr, "Service host stopped");
        result
    }
}

impl Drop for ServiceHost {
    fn drop(&mut self) {
        if let Some(running) = self.running.take() {
            running.shutdown.trigger();
        }
    }
}

/// Build the Axum router: one handler per registered (path, verb).
#[allow(deprecated)]
fn build_router(dispatcher: Arc<Dispatcher>, config: &HostConfig, prefix: Option<&str>) -> Router {
    let max_body_size = config.listener.max_body_size;

    let mut routes = Router::new();
    for (path, verbs) in dispatcher.table().paths() {
        let mut method_router: MethodRouter = MethodRouter::new();
        for verb in verbs {
            let dispatcher = dispatcher.clone();
            let route = path.to_string();
            let takes_parameters = dispatcher
                .table()
                .lookup(path, verb)
                .is_some_and(|registered| !registered.descriptor.parameters.is_empty());
            method_router = method_router.on(verb.method_filter(), move |request: Request<Body>| {
                serve_route(
                    dispatcher.clone(),
                    route.clone(),
                    verb,
                    takes_parameters,
                    max_body_size,
                    request,
                )
            });
        }
        // Axum answers HEAD with the GET handler unless HEAD has its own.
        method_router = method_router.on(MethodFilter::HEAD, unmatched);
        routes = routes.route(path, method_router.fallback(unmatched));
    }

    let mut app = match prefix {
        Some(prefix) => Router::new().nest(prefix, routes),
        None => routes,
    }
    .fallback(unmatched)
    .layer(RequestBodyLimitLayer::new(max_body_size));

    if config.timeouts.request_secs > 0 {
        app = app.layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

/// Handler for one (path, verb): read params, dispatch on a blocking
/// worker, write the response.
async fn serve_route(
    dispatcher: Arc<Dispatcher>,
    route: String,
    verb: HttpVerb,
    takes_parameters: bool,
    max_body_size: usize,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let span = tracing::info_span!(
        "dispatch",
        request_id = %request_id(request.headers()),
        verb = %verb,
        route = %route,
    );

    let response = match read_params(verb, takes_parameters, request, max_body_size).await {
        Ok(params) => {
            let worker_span = span.clone();
            let worker_route = route.clone();
            tokio::task::spawn_blocking(move || {
                worker_span.in_scope(|| dispatcher.dispatch(&worker_route, verb, &params))
            })
            .await
            .unwrap_or_else(|join| span.in_scope(|| translate(Err(DispatchError::Aborted(join.to_string())))))
        }
        Err(err) => span.in_scope(|| translate(Err(err.into()))),
    };

    span.in_scope(|| {
        tracing::debug!(
            status = response.status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request dispatched"
        )
    });
    metrics::record_request(&route, verb, response.status.as_u16(), start);
    response.into_response()
}

async fn unmatched(request: Request<Body>) -> Response {
    tracing::debug!(
        request_id = %request_id(request.headers()),
        method = %request.method(),
        path = %request.uri().path(),
        "No route matched"
    );
    not_found().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_address() {
        assert_eq!(
            parse_base_address("http://localhost:1234").unwrap(),
            BaseAddress {
                host: "localhost".into(),
                port: 1234,
                prefix: None,
            }
        );
        assert_eq!(
            parse_base_address("http://127.0.0.1:0/api/v1/").unwrap(),
            BaseAddress {
                host: "127.0.0.1".into(),
                port: 0,
                prefix: Some("/api/v1".into()),
            }
        );
        assert_eq!(parse_base_address("127.0.0.1:8080").unwrap().port, 8080);
        assert_eq!(parse_base_address("http://example.com").unwrap().port, 80);
        assert_eq!(parse_base_address("http://[::1]:9000").unwrap().host, "::1");
    }

    #[test]
    fn test_parse_base_address_rejects() {
        for address in ["https://localhost:1234", "ftp://example.com", "http://", "http://h:1/{x}", "127.0.0.1:80/api/{id}"] {
            assert!(
                matches!(parse_base_address(address), Err(HostError::InvalidBaseAddress(_))),
                "{address}"
            );
        }
    }

    #[tokio::test]
    async fn test_start_fails_on_configuration_error() {
        let mut host = ServiceHost::new(ServiceCatalog::new(), HostConfig::default());
        let err = host
            .start(
                "http://127.0.0.1:0",
                [Descriptor::new("missing", "Run", HttpVerb::Get, "/run")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Configuration(ConfigurationError::UnknownService(_))));
        assert!(!host.is_running());
    }

    #[tokio::test]
    async fn test_stop_when_not_running() {
        let mut host = ServiceHost::new(ServiceCatalog::new(), HostConfig::default());
        assert!(matches!(host.stop().await, Err(HostError::NotRunning)));
    }

    #[tokio::test]
    async fn test_start_twice() {
        let mut host = ServiceHost::new(ServiceCatalog::new(), HostConfig::default());
        host.start("http://127.0.0.1:0", Vec::<Descriptor>::new()).await.unwrap();
        let err = host.start("http://127.0.0.1:0", Vec::<Descriptor>::new()).await.unwrap_err();
        assert!(matches!(err, HostError::AlreadyRunning));
        host.stop().await.unwrap();
    }
}
