//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, delays ordered)
//! - Validate addresses and the remote base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;
use crate::resilience::RetryPolicy;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a parsed configuration, collecting every violation.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    match Url::parse(&config.remote.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "remote.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "remote.base_url",
            format!("'{}' is not a valid URL: {}", config.remote.base_url, e),
        )),
    }
    if !config.remote.path_prefix.starts_with('/') {
        errors.push(ValidationError::new("remote.path_prefix", "must start with '/'"));
    }
    if config.remote.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("remote.connect_timeout_ms", "must be > 0"));
    }
    if config.remote.request_timeout_ms == 0 {
        errors.push(ValidationError::new("remote.request_timeout_ms", "must be > 0"));
    }

    if config.retries.base_delay_ms == 0 {
        errors.push(ValidationError::new("retries.base_delay_ms", "must be > 0"));
    }
    if config.retries.max_delay_ms < config.retries.base_delay_ms {
        errors.push(ValidationError::new(
            "retries.max_delay_ms",
            "must be >= retries.base_delay_ms",
        ));
    }
    if !(0.0..=0.5).contains(&config.retries.jitter_ratio) {
        errors.push(ValidationError::new(
            "retries.jitter_ratio",
            "must be within [0.0, 0.5]",
        ));
    }

    // A call outliving the listener timeout would be answered with a bare 408.
    if config.listener.request_timeout_secs > 0 && config.remote.request_timeout_ms > 0 {
        let worst_case = RetryPolicy::from(&config.retries)
            .worst_case_call(Duration::from_millis(config.remote.request_timeout_ms));
        if worst_case > Duration::from_secs(config.listener.request_timeout_secs) {
            errors.push(ValidationError::new(
                "listener.request_timeout_secs",
                format!(
                    "must cover the longest logical call ({}ms with retries and backoff)",
                    worst_case.as_millis()
                ),
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
