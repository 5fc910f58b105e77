//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the host.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the service host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HostConfig {
    /// Listener configuration (base address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route descriptors.
    pub routes: Vec<RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Base address (e.g., "http://127.0.0.1:8080" or "http://0.0.0.0:8080/api").
    pub base_address: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            base_address: "http://127.0.0.1:8080".to_string(),
            max_body_size: 64 * 1024,
        }
    }
}

/// Timeout configuration, enforced by the HTTP layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds (0 disables).
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A route descriptor as written in the config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Service type name in the catalog.
    pub service: String,

    /// Method invoked to produce the response.
    pub entry_point: String,

    /// HTTP verb (GET, POST, PUT, DELETE).
    pub method: String,

    /// Literal route path.
    pub route: String,

    /// Zero-argument method run before the entry point.
    #[serde(default)]
    pub setup: Option<String>,

    /// Zero-argument method run after the entry point.
    #[serde(default)]
    pub teardown: Option<String>,

    /// Parameters in call order.
    #[serde(default)]
    pub parameters: Vec<ParameterConfig>,

    /// Expected result type.
    #[serde(default)]
    pub result: Option<String>,
}

/// A named, typed route parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParameterConfig {
    pub name: String,

    /// Type name (string, int, float, bool).
    #[serde(rename = "type")]
    pub kind: String,
}
