//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route file (JSON array of RouteDefinition)
//!     → table.rs (validate, compile path patterns, keep order)
//!     → router.rs (RouteStore: current table behind an atomic swap)
//!
//! Incoming request (method, path, query, headers, body)
//!     → dispatcher.rs (snapshot table, first match, delay, auth gate)
//!     → matcher.rs (path filter + placeholder extraction)
//!     → resolver.rs (artifact name: template, then match rule override)
//!     → artifact bytes or DispatchError
//! ```
//!
//! # Design Decisions
//! - Route order is the precedence contract: first match wins
//! - Tables are immutable; changes replace the whole table
//! - Path literals are never interpreted as regex

pub mod dispatcher;
pub mod matcher;
pub mod resolver;
pub mod route;
pub mod router;
pub mod table;

pub use dispatcher::{DispatchError, Dispatched, Dispatcher};
pub use route::{MatchRule, MatchSource, RouteDefinition};
pub use router::RouteStore;
pub use table::RouteTable;
