//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Metrics → Route table → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Release listener
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Stop the host
//! ```
//!
//! # Design Decisions
//! - Ordered startup: metrics first, then routes, then the listener
//! - Stopping is idempotent from the host's point of view

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run, StartupError};
