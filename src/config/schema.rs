//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the scenario relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Inbound listener configuration.
    pub listener: ListenerConfig,

    /// Remote service the relay calls into.
    pub remote: RemoteConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Fixed strings carried by every problem details payload.
    pub problem: ProblemConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Upper bound for serving one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Scheme, host and port of the remote service.
    pub base_url: String,

    /// Prefix prepended to every scenario (`<prefix>/<scenario>`).
    pub path_prefix: String,

    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,

    /// Per-attempt timeout (connect + response) in milliseconds.
    pub request_timeout_ms: u64,

    /// Trust any certificate presented by the remote.
    pub accept_invalid_certs: bool,

    /// User agent sent with outbound requests.
    pub user_agent: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:8473".to_string(),
            path_prefix: "/mock".to_string(),
            connect_timeout_ms: 1000,
            request_timeout_ms: 1000,
            accept_invalid_certs: true,
            user_agent: concat!("scenario-relay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Upper bound of the random jitter added to each delay, as a fraction
    /// of that delay. Clamped to `[0.0, 0.5]`.
    pub jitter_ratio: f64,

    /// Retry connect/timeout failures like retryable server errors.
    pub retry_transport_errors: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            jitter_ratio: 0.1,
            retry_transport_errors: false,
        }
    }
}

/// Problem details configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProblemConfig {
    /// Title of every problem details payload.
    pub title: String,

    /// Detail of every problem details payload.
    pub detail: String,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            title: "Problem accessing/updating remote resources hosted in Wiremock cloud".to_string(),
            detail: "WireMock was told to fail in this case: you got what you mocked".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
