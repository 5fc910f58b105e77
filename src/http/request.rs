//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Extract the parameter sources the binder reads
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An ID sent by the client is kept, not replaced
//! - Only form-encoded bodies are read, and only for non-GET verbs

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::dispatch::RequestParams;
use crate::error::BindingError;
use crate::routing::HttpVerb;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates a UUID v4 request ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request, or `"unknown"` when absent.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Collect the query string and, for non-GET verbs, a form body.
///
/// The body is left unread when the route takes no parameters.
pub async fn read_params(
    verb: HttpVerb,
    takes_parameters: bool,
    request: Request<Body>,
    max_body_size: usize,
) -> Result<RequestParams, BindingError> {
    let (parts, body) = request.into_parts();
    let params = RequestParams::from_query(parts.uri.query());

    if !takes_parameters || verb == HttpVerb::Get || !is_form(&parts.headers) {
        return Ok(params);
    }

    let bytes = to_bytes(body, max_body_size)
        .await
        .map_err(|e| BindingError::UnreadableBody(e.to_string()))?;
    Ok(params.with_form(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_post_reads_form_body() {
        let request = form_request("POST", "/changecase?a=1", "text=HELLO");
        let params = read_params(HttpVerb::Post, true, request, 1024).await.unwrap();
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("text"), Some("HELLO"));
    }

    #[tokio::test]
    async fn test_get_ignores_body() {
        let request = form_request("GET", "/changecase", "text=HELLO");
        let params = read_params(HttpVerb::Get, true, request, 1024).await.unwrap();
        assert_eq!(params.get("text"), None);
    }

    #[tokio::test]
    async fn test_non_form_body_ignored() {
        let request = Request::builder()
            .method("PUT")
            .uri("/x")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"text\":\"x\"}"))
            .unwrap();
        let params = read_params(HttpVerb::Put, true, request, 1024).await.unwrap();
        assert_eq!(params.get("text"), None);
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let request = form_request("POST", "/x", "text=0123456789");
        let err = read_params(HttpVerb::Post, true, request, 4).await.unwrap_err();
        assert!(matches!(err, BindingError::UnreadableBody(_)));
    }

    #[tokio::test]
    async fn test_body_skipped_without_parameters() {
        let request = form_request("DELETE", "/x?a=1", "text=0123456789");
        let params = read_params(HttpVerb::Delete, false, request, 4).await.unwrap();
        assert_eq!(params.get("a"), Some("1"));
        assert_eq!(params.get("text"), None);
    }

    #[test]
    fn test_request_id_generation() {
        let request = Request::builder().body(()).unwrap();
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());

        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID.clone(), HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");
    }
}
