//! Cross-origin policy.
//!
//! The request `Origin` is echoed back only when it is on the allow-list (or
//! the list contains `*`). Preflight `OPTIONS` requests are answered by the
//! layer itself and never reach the dispatcher.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const WILDCARD: &str = "*";

/// Build the CORS layer from the configured allow-list.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allowed: Arc<[String]> = allowed_origins.into();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin_allowed(&allowed, origin)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn origin_allowed(allowed: &[String], origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    allowed.iter().any(|o| o == WILDCARD || o == origin)
}
