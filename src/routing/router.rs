//! Live route table holder.
//!
//! # Responsibilities
//! - Hold the current route table as an immutable snapshot
//! - Hand out snapshots to in-flight requests
//! - Replace the whole table atomically on admin write or file reload
//!
//! # Design Decisions
//! - ArcSwap pointer swap: readers never lock and never see a partial table
//! - A request keeps the snapshot it started with, even if a swap lands mid-flight
//! - Last writer wins; there is no versioning between concurrent replacements

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::table::RouteTable;

/// Shared, swappable route table.
#[derive(Debug)]
pub struct RouteStore {
    current: ArcSwap<RouteTable>,
}

impl RouteStore {
    pub fn new(table: RouteTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// The table as of now. Hold on to it for the whole request.
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.current.load_full()
    }

    /// Swap in a new table.
    pub fn replace(&self, table: RouteTable) {
        let routes = table.len();
        self.current.store(Arc::new(table));
        metrics::record_route_reload("applied");
        tracing::info!(routes, "Route table replaced");
    }
}
