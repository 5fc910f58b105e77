//! Outcome → response translation.
//!
//! # Responsibilities
//! - Render successful results as 200 bodies
//! - Turn any per-request failure into a 500 with a diagnostic body
//! - Provide the 404 used for unmatched (path, verb)
//!
//! # Design Decisions
//! - Status depends only on the failure class, never on its message
//! - Failures are logged here, once per request

use axum::http::StatusCode;

use crate::error::DispatchError;
use crate::service::Value;

/// Status and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
    pub status: StatusCode,
    pub body: String,
}

impl DispatchResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }
}

/// Map a lifecycle result onto a response.
pub fn translate(result: Result<Value, DispatchError>) -> DispatchResponse {
    match result {
        Ok(value) => DispatchResponse::ok(value.render()),
        Err(err) => {
            tracing::error!(error = %err, "Request failed");
            DispatchResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: err.to_string(),
            }
        }
    }
}

/// Response for an unmatched (path, verb). Not a server fault.
pub fn not_found() -> DispatchResponse {
    DispatchResponse {
        status: StatusCode::NOT_FOUND,
        body: "Not Found".to_string(),
    }
}
