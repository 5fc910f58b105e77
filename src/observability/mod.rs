//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log output (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (route, verb, status, request_id) on every event
//! - Request ID flows from the HTTP layer into the dispatch span
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
