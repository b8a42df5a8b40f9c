//! Scenario relay library.
//!
//! Fetches scenarios from a remote HTTP service, retries transient server
//! failures with exponential backoff and turns every unrecoverable outcome
//! into problem details instead of an error.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod problem;
pub mod remote;
pub mod resilience;
pub mod service;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use problem::{ProblemDetails, Reply};
pub use service::RelayService;
