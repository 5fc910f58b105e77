//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Registration (at startup):
//!     Descriptor[]
//!     → table.rs (validate path, reject duplicate (path, verb))
//!     → ServiceCatalog::resolve (method names → handles)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (path, verb)
//!     → table.rs (exact lookup)
//!     → Return: RegisteredRoute or None (404)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Literal paths only, matched exactly
//! - Deterministic: same (path, verb) always yields the same route

pub mod descriptor;
pub mod table;

pub use descriptor::{Descriptor, HttpVerb, ParameterSpec};
pub use table::{RegisteredRoute, RouteTable};
