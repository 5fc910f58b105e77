//! Configuration validation.
//!
//! # Responsibilities
//! - Syntactic validation beyond what serde checks
//! - Validate the listener base address
//! - Detect conflicting routes and malformed parameter lists
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HostConfig → Result<(), Vec<ValidationError>>
//! - Method resolution is left to the route table, which knows the services

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::HostConfig;
use crate::http::server::parse_base_address;

/// A single problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.base_address `{0}` is not a valid http address")]
    BaseAddress(String),

    #[error("routes[{index}]: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("routes[{index}]: route `{route}` must start with '/'")]
    RelativeRoute { index: usize, route: String },

    #[error("routes[{index}]: parameter `{name}` is declared more than once")]
    DuplicateParameter { index: usize, name: String },

    #[error("routes[{index}]: {method} {route} is already declared by routes[{first}]")]
    DuplicateRoute {
        index: usize,
        first: usize,
        method: String,
        route: String,
    },
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &HostConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if parse_base_address(&config.listener.base_address).is_err() {
        errors.push(ValidationError::BaseAddress(config.listener.base_address.clone()));
    }

    let mut seen = std::collections::HashMap::new();
    for (index, route) in config.routes.iter().enumerate() {
        for (field, value) in [
            ("service", &route.service),
            ("entry_point", &route.entry_point),
            ("method", &route.method),
        ] {
            if value.trim().is_empty() {
                errors.push(ValidationError::EmptyField { index, field });
            }
        }

        if !route.route.starts_with('/') {
            errors.push(ValidationError::RelativeRoute {
                index,
                route: route.route.clone(),
            });
        }

        let mut names = HashSet::new();
        for parameter in &route.parameters {
            if parameter.name.is_empty() {
                errors.push(ValidationError::EmptyField {
                    index,
                    field: "parameters.name",
                });
            } else if !names.insert(parameter.name.as_str()) {
                errors.push(ValidationError::DuplicateParameter {
                    index,
                    name: parameter.name.clone(),
                });
            }
        }

        let key = (route.route.as_str(), route.method.to_ascii_uppercase());
        if let Some(&first) = seen.get(&key) {
            errors.push(ValidationError::DuplicateRoute {
                index,
                first,
                method: key.1.clone(),
                route: route.route.clone(),
            });
        } else {
            seen.insert(key, index);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
