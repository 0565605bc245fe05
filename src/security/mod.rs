//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response:
//!     → cors.rs (allow-list origin echo, preflight short-circuit)
//!
//! Auth-gated routes:
//!     → token.rs (Bearer JWT: HMAC family only, expiry enforced)
//! ```
//!
//! # Design Decisions
//! - Fail closed: any token problem means unauthorized
//! - One shared symmetric secret, held as process configuration

pub mod cors;
pub mod token;
