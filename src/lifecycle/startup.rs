//! Startup orchestration.
//!
//! Config is already loaded and validated when this runs. What remains is
//! the part that must succeed before any traffic is accepted: the route
//! table, then the listener.

use std::path::Path;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::schema::ServerConfig;
use crate::config::watcher::RouteWatcher;
use crate::routing::table::RouteTable;
use crate::storage::route_file::{RouteFile, RouteFileError};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Routes(#[from] RouteFileError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to watch route file: {0}")]
    Watch(#[from] notify::Error),
}

/// Everything the server needs before it starts serving.
pub struct Prepared {
    pub table: RouteTable,
    pub listener: TcpListener,
    pub route_updates: mpsc::UnboundedReceiver<RouteTable>,
    /// Keeps the file watcher alive; dropping it stops watching.
    pub watcher: Option<notify::RecommendedWatcher>,
}

/// Load the route table, optionally start watching it, bind the listener.
pub async fn prepare(config: &ServerConfig) -> Result<Prepared, StartupError> {
    let route_file = RouteFile::new(&config.routes.path);
    let table = route_file.load_table()?;
    tracing::info!(
        path = %route_file.path().display(),
        routes = table.len(),
        "Route table loaded"
    );

    let (watcher, route_updates) = if config.routes.watch {
        let (watcher, rx) = RouteWatcher::new(Path::new(&config.routes.path));
        (Some(watcher.run()?), rx)
    } else {
        // Sender dropped immediately: the server sees a closed channel.
        let (_, rx) = mpsc::unbounded_channel();
        (None, rx)
    };

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    Ok(Prepared {
        table,
        listener,
        route_updates,
        watcher,
    })
}
