//! Response conversion.
//!
//! # Responsibilities
//! - Turn a DispatchResponse into an HTTP response
//! - Plain-text bodies with an explicit content type

use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::dispatch::DispatchResponse;

impl IntoResponse for DispatchResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.body,
        )
            .into_response()
    }
}
