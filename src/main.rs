//! Service host
//!
//! Serves the built-in service types over HTTP from a route file.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http (Axum, request ID, body limit, timeout)
//!                       │
//!                       ▼
//!                     routing (route table: (path, verb) → recipe)
//!                       │
//!                       ▼
//!                     dispatch (bind → construct → setup → entry point → teardown)
//!                       │
//!     Client Response   ▼
//!     ◀────────────── translate (200 value / 500 fault / 404)
//! ```

use std::path::PathBuf;

use clap::Parser;

use servicehost::{builtin, config, lifecycle, observability::logging};

#[derive(Parser, Debug)]
#[command(name = "servicehost", version, about = "Serve service methods over HTTP")]
struct Cli {
    /// Route and listener configuration (TOML).
    #[arg(short, long, default_value = "servicehost.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = config::load_config(&cli.config)?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        base_address = %config.listener.base_address,
        routes = config.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "servicehost v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let catalog = builtin::catalog()?;
    lifecycle::run(config, catalog).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
