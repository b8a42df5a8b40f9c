//! Remote service access.
//!
//! # Data Flow
//! ```text
//! scenario
//!     → dispatcher.rs (build path, register call with counter.rs)
//!     → transport.rs (GET <base_url><path>)
//!     → classifier (status → Outcome)
//! ```

pub mod counter;
pub mod dispatcher;
pub mod transport;

pub use counter::{InFlightCounter, InFlightGuard};
pub use dispatcher::{Dispatcher, LogicalCall};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};
