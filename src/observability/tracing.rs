//! Spans for logical calls.
//!
//! Every event emitted while a call is retried carries the same `call_id`,
//! so one call's attempts can be picked out of interleaved logs.

use tracing::Span;
use uuid::Uuid;

/// Span covering one logical call from submission to termination.
pub fn call_span(call_id: Uuid, path: &str) -> Span {
    tracing::info_span!("logical_call", call_id = %call_id, path = %path)
}
