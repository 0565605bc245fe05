//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, tracing, request ID)
//! - Bind server to listener
//! - Dispatch everything unclaimed to the mock route table
//! - Apply route table updates from the file watcher
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::schema::{AdminConfig, ServerConfig};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, InboundRequest};
use crate::http::token::issue_token;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{Dispatcher, RouteStore, RouteTable};
use crate::security::cors::cors_layer;
use crate::security::token::TokenService;
use crate::storage::{ArtifactStore, RouteFile};

/// Path of the token issuance endpoint.
pub const TOKEN_PATH: &str = "/token";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub routes: Arc<RouteStore>,
    pub route_file: Arc<RouteFile>,
    pub tokens: Arc<TokenService>,
    pub admin: AdminConfig,
    pub max_body_size: usize,
}

/// HTTP server for the mock API.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server serving `table`.
    pub fn new(config: ServerConfig, table: RouteTable) -> Self {
        let routes = Arc::new(RouteStore::new(table));
        let tokens = Arc::new(TokenService::new(&config.auth.secret));
        let dispatcher = Arc::new(Dispatcher::new(
            routes.clone(),
            ArtifactStore::new(&config.responses.root),
            tokens.clone(),
        ));

        let state = AppState {
            dispatcher,
            routes,
            route_file: Arc::new(RouteFile::new(&config.routes.path)),
            tokens,
            admin: config.admin.clone(),
            max_body_size: config.limits.max_body_size,
        };

        let router = Self::build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route(TOKEN_PATH, post(issue_token))
            .merge(setup_admin_router(state.clone()));

        if config.static_files.enabled {
            router = router.nest_service(
                &config.static_files.mount,
                ServeDir::new(&config.static_files.root),
            );
        }

        router
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(cors_layer(&config.cors.allowed_origins)),
            )
    }

    /// Run the server until `shutdown` fires.
    ///
    /// Tables received on `route_updates` replace the live table.
    pub async fn run(
        self,
        listener: TcpListener,
        mut route_updates: mpsc::UnboundedReceiver<RouteTable>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.state.routes.snapshot().len(),
            "HTTP server starting"
        );

        let routes = self.state.routes.clone();
        let updater = tokio::spawn(async move {
            while let Some(table) = route_updates.recv().await {
                routes.replace(table);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        updater.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The live route table holder.
    pub fn routes(&self) -> Arc<RouteStore> {
        self.state.routes.clone()
    }
}

/// Fallback handler: every request not claimed by a built-in endpoint.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let inbound = InboundRequest::from_request(request, state.max_body_size).await;
    let request_id = inbound.request_id().to_string();
    let method = inbound.method.to_string();

    match state.dispatcher.dispatch(&inbound).await {
        Ok(served) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %inbound.path,
                route = served.route,
                artifact = %served.artifact,
                "Served mock response"
            );
            metrics::record_request(&method, 200, "served", start_time);
            served.into_response()
        }
        Err(e) => {
            let status = e.status();
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %inbound.path,
                outcome = e.outcome(),
                error = %e,
                "Mock request failed"
            );
            metrics::record_request(&method, status.as_u16(), e.outcome(), start_time);
            e.into_response()
        }
    }
}
