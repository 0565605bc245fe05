//! Configurable HTTP mock server.
//!
//! Serves canned JSON artifacts selected by a declarative, ordered route
//! table, so client developers can exercise an API contract before the real
//! backend exists.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!   Client Request    │  ┌────────┐   ┌──────────┐   ┌────────────────┐   │
//!   ──────────────────┼─▶│  cors  │──▶│  http    │──▶│   dispatcher   │   │
//!                     │  │preflght│   │ server   │   │ match → delay  │   │
//!                     │  └────────┘   └────┬─────┘   │ → auth → res.  │   │
//!                     │                    │         └───────┬────────┘   │
//!                     │       /token, /api/routes,           │            │
//!                     │       /swagger handled here          ▼            │
//!   Client Response   │                             ┌────────────────┐    │
//!   ◀─────────────────┼─────────────────────────────│ artifact store │    │
//!                     │                             │  responses/…   │    │
//!                     │                             └────────────────┘    │
//!                     │  Cross-cutting: config, observability, lifecycle  │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mock_server::config::load_config;
use mock_server::lifecycle::{signals, startup, Shutdown};
use mock_server::observability::{logging, metrics};
use mock_server::HttpServer;

#[derive(Parser)]
#[command(name = "mock-server")]
#[command(about = "Serve canned JSON responses from a declarative route table", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mock-server: configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init(&config.observability);
    tracing::info!("mock-server v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = %config.routes.path,
        responses = %config.responses.root,
        allowed_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let prepared = match startup::prepare(&config).await {
        Ok(prepared) => prepared,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let startup::Prepared {
        table,
        listener,
        route_updates,
        watcher: _watcher,
    } = prepared;

    let server = HttpServer::new(config, table);
    if let Err(e) = server.run(listener, route_updates, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
