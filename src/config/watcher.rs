//! Route file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::routing::table::RouteTable;
use crate::storage::route_file::RouteFile;

/// A watcher that monitors the route configuration file for changes.
pub struct RouteWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<RouteTable>,
}

impl RouteWatcher {
    /// Create a new RouteWatcher.
    ///
    /// Returns the watcher and a receiver for reloaded tables.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<RouteTable>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file in a background thread.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let file = RouteFile::new(&self.path);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Route file change detected, reloading...");
                        match file.load_table() {
                            Ok(table) => {
                                let _ = tx.send(table);
                            }
                            Err(e) => {
                                metrics::record_route_reload("rejected");
                                tracing::error!(
                                    "Failed to reload routes: {}. Keeping current table.",
                                    e
                                );
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Route watcher started");
        Ok(watcher)
    }
}
