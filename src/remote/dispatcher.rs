//! Request dispatch to the remote service.
//!
//! # Responsibilities
//! - Turn a scenario into the request path (`<prefix>/<scenario>`)
//! - Register each logical call with the in-flight counter exactly once
//! - Perform single attempts and hand back a classified [`Outcome`]

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::remote::counter::{InFlightCounter, InFlightGuard};
use crate::remote::transport::Transport;
use crate::resilience::classifier::Outcome;

/// One submitted logical call. Dropping it ends the call's accounting.
#[derive(Debug)]
pub struct LogicalCall {
    id: Uuid,
    path: String,
    _guard: InFlightGuard,
}

impl LogicalCall {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Request path, also used as the problem details `instance`.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Sends attempts through a [`Transport`] and owns the in-flight counter.
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    path_prefix: String,
    in_flight: InFlightCounter,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("path_prefix", &self.path_prefix)
            .field("in_flight", &self.in_flight.get())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, path_prefix: &str) -> Self {
        Self {
            transport,
            path_prefix: path_prefix.trim_end_matches('/').to_string(),
            in_flight: InFlightCounter::new(),
        }
    }

    /// Path the given scenario is fetched from. The scenario is not validated.
    pub fn request_path(&self, scenario: &str) -> String {
        format!("{}/{}", self.path_prefix, scenario)
    }

    /// Start a logical call for `scenario`.
    pub fn submit(&self, scenario: &str) -> LogicalCall {
        LogicalCall {
            id: Uuid::new_v4(),
            path: self.request_path(scenario),
            _guard: self.in_flight.enter(),
        }
    }

    /// Perform one attempt of `call`.
    pub async fn send(&self, call: &LogicalCall) -> Outcome {
        match self.transport.get(&call.path).await {
            Ok(response) => Outcome::from_response(response.status, &response.body),
            Err(e) => Outcome::TransportError(e),
        }
    }

    /// Number of logical calls currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Shared handle on the counter, for observers.
    pub fn in_flight_counter(&self) -> InFlightCounter {
        self.in_flight.clone()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::remote::transport::{RawResponse, TransportError};

    struct EchoPath;

    #[async_trait]
    impl Transport for EchoPath {
        async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
            if path.ends_with("/down") {
                return Err(TransportError::Connect("refused".into()));
            }
            Ok(RawResponse {
                status: 200,
                body: serde_json::to_vec(&serde_json::json!({ "path": path })).unwrap(),
            })
        }
    }

    #[test]
    fn test_request_path_forwards_scenario_as_is() {
        let dispatcher = Dispatcher::new(Arc::new(EchoPath), "/mock/");
        assert_eq!(dispatcher.request_path("ok"), "/mock/ok");
        assert_eq!(dispatcher.request_path("a b/../c"), "/mock/a b/../c");
    }

    #[tokio::test]
    async fn test_submit_counts_calls_not_attempts() {
        let dispatcher = Dispatcher::new(Arc::new(EchoPath), "/mock");
        let call = dispatcher.submit("ok");
        assert_eq!(dispatcher.in_flight(), 1);

        for _ in 0..3 {
            let outcome = dispatcher.send(&call).await;
            assert_eq!(outcome, Outcome::Success(serde_json::json!({"path": "/mock/ok"})));
        }
        assert_eq!(dispatcher.in_flight(), 1);

        drop(call);
        assert_eq!(dispatcher.in_flight(), 0);
    }

    #[test]
    fn test_debug_shows_prefix_and_count() {
        let dispatcher = Dispatcher::new(Arc::new(EchoPath), "/mock");
        let _call = dispatcher.submit("ok");
        let debug = format!("{:?}", dispatcher);
        assert!(debug.contains("path_prefix: \"/mock\""));
        assert!(debug.contains("in_flight: 1"));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_outcome() {
        let dispatcher = Dispatcher::new(Arc::new(EchoPath), "/mock");
        let call = dispatcher.submit("down");
        let outcome = dispatcher.send(&call).await;
        assert_eq!(
            outcome,
            Outcome::TransportError(TransportError::Connect("refused".into()))
        );
    }
}
