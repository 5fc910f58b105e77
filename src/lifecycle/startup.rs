//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics before any traffic
//! - Start the host on the configured base address and routes
//! - Block until a stop signal, then stop the host
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener starts last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::HostConfig;
use crate::http::{HostError, ServiceHost};
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::service::ServiceCatalog;

/// Error type for a full host run.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),

    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Run a host until SIGINT/SIGTERM.
pub async fn run(config: HostConfig, catalog: ServiceCatalog) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let mut host = ServiceHost::new(catalog, config);
    let address = host.start_configured().await?;
    tracing::info!(address = %address, "Listening for requests");

    signals::wait_for_shutdown().await;

    tracing::info!("Shutting down");
    host.stop().await?;
    Ok(())
}
