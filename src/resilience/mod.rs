//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt answered by the remote:
//!     → classifier.rs (status → Outcome)
//!     → retries.rs (retry with backoff, or terminate)
//!     → backoff.rs (delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Only 503 and 504 are retried; transport failures are opt-in
//! - Attempts of one call never overlap
//! - Every terminal state resolves to a value, never an error

pub mod backoff;
pub mod classifier;
pub mod retries;

pub use classifier::{classify, Classification, Outcome, StatusClass};
pub use retries::{RetryController, RetryPolicy, RetryState};
