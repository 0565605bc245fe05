use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::http::response::json_bytes;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::table::RouteTable;

/// `GET /api/routes`: the stored configuration, byte for byte.
pub async fn get_routes(State(state): State<AppState>) -> Response {
    match state.route_file.read_raw().await {
        Ok(bytes) => json_bytes(bytes),
        Err(e) => {
            tracing::error!(path = %state.route_file.path().display(), error = %e, "Failed to read route configuration");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read routes").into_response()
        }
    }
}

/// `POST /api/routes`: overwrite the stored configuration verbatim, then try
/// to make it live. Content that does not compile leaves the current table
/// in place.
pub async fn replace_routes(State(state): State<AppState>, body: Bytes) -> Response {
    if let Err(e) = state.route_file.write_raw(&body).await {
        tracing::error!(path = %state.route_file.path().display(), error = %e, "Failed to write route configuration");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to write routes").into_response();
    }

    match RouteTable::from_json(&body) {
        Ok(table) => state.routes.replace(table),
        Err(e) => {
            metrics::record_route_reload("rejected");
            tracing::warn!(error = %e, "Stored route configuration is not loadable; keeping current table");
        }
    }

    StatusCode::OK.into_response()
}
