//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (syntactic checks on every section)
//!     → HostConfig (validated, immutable)
//!     → routes → Descriptor (TryFrom) → RouteTable (semantic checks)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde + validation.rs) from semantic
//!   checks (method resolution in the route table)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{HostConfig, ListenerConfig, ObservabilityConfig, ParameterConfig, RouteConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
