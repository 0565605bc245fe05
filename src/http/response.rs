//! Response construction.
//!
//! # Responsibilities
//! - Serve artifacts verbatim as `application/json`
//! - Map dispatch failures to status codes
//!
//! # Design Decisions
//! - The artifact body is never parsed or validated
//! - No-route and missing-artifact share a 404 on the wire; they differ only in logs

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::dispatcher::{DispatchError, Dispatched};

pub const NOT_FOUND_BODY: &str = "404 page not found";
pub const ARTIFACT_MISSING_BODY: &str = "Response file not found";
pub const UNAUTHORIZED_BODY: &str = "Unauthorized";

impl DispatchError {
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            DispatchError::NoRouteMatch { .. }
            | DispatchError::ArtifactMissing { .. }
            | DispatchError::ArtifactRejected { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let body = match self {
            DispatchError::NoRouteMatch { .. } => NOT_FOUND_BODY,
            DispatchError::Unauthorized { .. } => UNAUTHORIZED_BODY,
            DispatchError::ArtifactMissing { .. } | DispatchError::ArtifactRejected { .. } => {
                ARTIFACT_MISSING_BODY
            }
        };
        (self.status(), body).into_response()
    }
}

impl IntoResponse for Dispatched {
    fn into_response(self) -> Response {
        json_bytes(self.body)
    }
}

/// 200 with raw bytes labelled as JSON.
pub fn json_bytes(body: impl Into<Body>) -> Response {
    let mut response = Response::new(body.into());
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
