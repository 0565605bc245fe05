//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!
//! Route file change (when routes.watch is on):
//!     watcher.rs detects change
//!     → RouteFile reload + RouteTable compile
//!     → sent to the server, which swaps the live table
//! ```
//!
//! # Design Decisions
//! - Server config is immutable once loaded; only the route table is hot-swappable
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::ServerConfig;
