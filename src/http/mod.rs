//! HTTP host adapter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one handler per (path, verb))
//!     → request.rs (request ID, query string, form body)
//!     → dispatch engine (bind → invoke → translate) on a blocking worker
//!     → response.rs (DispatchResponse → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{parse_base_address, BaseAddress, HostError, ServiceHost};
