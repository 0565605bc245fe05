//! Token issuance endpoint.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
struct TokenRequest {
    #[serde(default)]
    sub: String,
}

/// `POST /token` with `{"sub": "..."}`.
pub async fn issue_token(State(state): State<AppState>, body: Bytes) -> Response {
    let subject = match serde_json::from_slice::<TokenRequest>(&body) {
        Ok(req) if !req.sub.is_empty() => req.sub,
        _ => return (StatusCode::BAD_REQUEST, "Invalid request").into_response(),
    };

    match state.tokens.issue(&subject) {
        Ok(issued) => {
            tracing::info!(sub = %subject, expires_at = %issued.expires_at, "Token issued");
            Json(issued).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Token generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Token generation failed").into_response()
        }
    }
}
