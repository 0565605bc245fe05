//! Request handling.
//!
//! # Responsibilities
//! - Assign a unique request ID (UUID v4) and propagate it to the response
//! - Buffer the request body up to the configured limit
//! - Capture the parts of a request that dispatch needs (method, path, query, headers, body)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A body that cannot be buffered is treated as empty, never as a failure
//! - Routes see the percent-decoded path; a path that does not decode to
//!   UTF-8 is kept as sent

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, Method, Request};
use percent_encoding::percent_decode_str;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer assigning a UUID request ID when the client sent none.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request ID of an inbound request, or `unknown`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Everything the dispatcher needs to know about one request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    /// Split an axum request, buffering at most `body_limit` bytes of body.
    pub async fn from_request(request: Request<Body>, body_limit: usize) -> Self {
        let (parts, body) = request.into_parts();
        let body = match axum::body::to_bytes(body, body_limit).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, "Request body could not be buffered, treating as empty");
                Bytes::new()
            }
        };

        Self {
            method: parts.method,
            path: decode_path(parts.uri.path()),
            query: parts.uri.query().map(String::from),
            headers: parts.headers,
            body,
        }
    }

    pub fn request_id(&self) -> &str {
        request_id(&self.headers)
    }
}

/// Percent-decode a request path, falling back to the raw text.
pub fn decode_path(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => {
            tracing::debug!(path = raw, "Request path is not valid UTF-8 once decoded");
            raw.to_string()
        }
    }
}
