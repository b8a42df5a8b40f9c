//! The relay service: dispatcher and retry controller wired together.

use std::sync::Arc;

use crate::config::RelayConfig;
use crate::problem::Reply;
use crate::remote::{Dispatcher, HttpTransport, Transport, TransportError};
use crate::resilience::{RetryController, RetryPolicy};

/// Fetches scenarios from the remote service. Cheap to clone.
#[derive(Debug, Clone)]
pub struct RelayService {
    dispatcher: Arc<Dispatcher>,
    controller: Arc<RetryController>,
}

impl RelayService {
    pub fn new(dispatcher: Dispatcher, controller: RetryController) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            controller: Arc::new(controller),
        }
    }

    /// Build the service over an arbitrary transport.
    pub fn with_transport(config: &RelayConfig, transport: Arc<dyn Transport>) -> Self {
        let dispatcher = Dispatcher::new(transport, &config.remote.path_prefix);
        let controller = RetryController::new(
            RetryPolicy::from(&config.retries),
            config.problem.clone(),
        );
        Self::new(dispatcher, controller)
    }

    /// Build the service over the configured HTTP client.
    pub fn from_config(config: &RelayConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::from_config(&config.remote)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Fetch `scenario`, retrying as configured. Never fails: unrecoverable
    /// outcomes come back as [`Reply::Problem`].
    pub async fn fetch(&self, scenario: &str) -> Reply {
        self.controller.run(&self.dispatcher, scenario).await
    }

    /// Number of logical calls currently outstanding.
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }
}
