//! Administrative surface for the persisted route configuration.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use crate::http::server::AppState;
use self::auth::admin_auth_middleware;
use self::handlers::{get_routes, replace_routes};

/// Path of the raw route configuration endpoint.
pub const ROUTES_PATH: &str = "/api/routes";

/// Admin routes, to be merged into the main router. `state` feeds the
/// API-key middleware.
pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(ROUTES_PATH, get(get_routes).post(replace_routes))
        .layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
