//! Outbound HTTP transport.
//!
//! # Responsibilities
//! - Perform `GET <base_url><path>` against the remote service
//! - Apply connect/request timeouts and the TLS trust policy
//! - Report failures below the HTTP layer as [`TransportError`]
//!
//! # Design Decisions
//! - Redirects are not followed; a 3xx is handed back like any other status
//! - The body is read fully; the relay never streams

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use thiserror::Error;

use crate::config::RemoteConfig;

/// Status and body of one answered attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Failures below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The remote could not be reached.
    #[error("Connection to remote failed: {0}")]
    Connect(String),

    /// Connect or response deadline elapsed.
    #[error("Remote did not answer in time: {0}")]
    Timeout(String),

    /// The response arrived but its body could not be read or decoded.
    #[error("Unreadable response body: {0}")]
    Body(String),

    /// Any other request failure.
    #[error("Request to remote failed: {0}")]
    Request(String),

    /// The HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Status reported in problem details when no HTTP status was received.
    pub fn problem_status(&self) -> u16 {
        match self {
            TransportError::Timeout(_) => 504,
            _ => 502,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            TransportError::Body(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Something that can perform one GET round-trip.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a configured reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build the client described by `config`.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        if config.accept_invalid_certs {
            tracing::warn!(base_url = %config.base_url, "Remote certificates will not be verified");
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Sending GET to remote");

        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_status_for_transport_failures() {
        assert_eq!(TransportError::Timeout("t".into()).problem_status(), 504);
        assert_eq!(TransportError::Connect("c".into()).problem_status(), 502);
        assert_eq!(TransportError::Body("b".into()).problem_status(), 502);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = RemoteConfig {
            base_url: "http://127.0.0.1:9/".into(),
            ..RemoteConfig::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn test_unreachable_remote_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = RemoteConfig {
            base_url,
            accept_invalid_certs: false,
            ..RemoteConfig::default()
        };
        let transport = HttpTransport::from_config(&config).unwrap();

        let err = transport.get("/mock/ok").await.unwrap_err();
        assert!(
            matches!(err, TransportError::Connect(_) | TransportError::Timeout(_)),
            "unexpected error: {err:?}"
        );
    }
}
