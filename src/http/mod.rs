//! Inbound HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! GET /test/{scenario}
//!     → server.rs (request ID, trace, timeout)
//!     → RelayService::fetch
//!     → JSON body (remote body or problem details), 200 OK
//! ```

pub mod server;

pub use server::{AppState, HttpServer, InFlightStatus, ServerError};
