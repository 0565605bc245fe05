//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, CORS, request ID, trace)
//!     → token.rs (POST /token) | admin (/api/routes) | static files
//!     → otherwise request.rs (snapshot + buffered body)
//!     → routing::Dispatcher
//!     → response.rs (artifact or error status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;
pub mod token;

pub use request::{InboundRequest, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
