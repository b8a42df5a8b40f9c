//! Response classification.
//!
//! # Responsibilities
//! - Map a status code to success, client error, retryable or terminal server error
//! - Attach the fixed message reported for each class
//! - Turn one attempt's response (or transport failure) into an [`Outcome`]
//!
//! # Mapping
//! ```text
//! 2xx                     → Success
//! 400                     → ClientError       "Bad Request, try again with something better"
//! 404                     → ClientError       "Resource not found"
//! other registered 4xx    → ClientError       "Unexpected status code received from Server"
//! 503                     → Retryable         "Remote server is unavailable"
//! 504                     → Retryable         "Gateway timeout"
//! other registered 5xx    → NonRetryable      "Unexpected status code received from Server"
//! anything else           → NonRetryable      "Unknown status code received from Server"
//! ```
//!
//! A code counts as registered when it has a canonical reason phrase.

use std::fmt;

use reqwest::StatusCode;
use serde_json::Value;

use crate::remote::TransportError;

const BAD_REQUEST: &str = "Bad Request, try again with something better";
const NOT_FOUND: &str = "Resource not found";
const UNEXPECTED: &str = "Unexpected status code received from Server";
const UNAVAILABLE: &str = "Remote server is unavailable";
const GATEWAY_TIMEOUT: &str = "Gateway timeout";
const UNKNOWN: &str = "Unknown status code received from Server";

/// Class of a received status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Success,
    ClientError,
    RetryableServerError,
    NonRetryableServerError,
}

/// Verdict for one status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class: StatusClass,
    pub status: u16,
    pub message: &'static str,
}

/// Classify a raw status code.
pub fn classify(status: u16) -> Classification {
    let (class, message) = match StatusCode::from_u16(status) {
        Ok(code) if code.is_success() => (StatusClass::Success, ""),
        Ok(code) if code.canonical_reason().is_some() => match status {
            400 => (StatusClass::ClientError, BAD_REQUEST),
            404 => (StatusClass::ClientError, NOT_FOUND),
            401..=499 => (StatusClass::ClientError, UNEXPECTED),
            503 => (StatusClass::RetryableServerError, UNAVAILABLE),
            504 => (StatusClass::RetryableServerError, GATEWAY_TIMEOUT),
            500..=599 => (StatusClass::NonRetryableServerError, UNEXPECTED),
            _ => (StatusClass::NonRetryableServerError, UNKNOWN),
        },
        _ => (StatusClass::NonRetryableServerError, UNKNOWN),
    };

    Classification {
        class,
        status,
        message,
    }
}

/// Result of a single attempt. Produced fresh per attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    ClientError { status: u16, message: &'static str },
    RetryableServerError { status: u16, message: &'static str },
    NonRetryableServerError { status: u16, message: &'static str },
    TransportError(TransportError),
}

impl Outcome {
    /// Build the outcome of an attempt that received a response.
    ///
    /// An empty success body resolves to JSON `null`; a body that is not
    /// JSON is reported as a transport-level failure.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let verdict = classify(status);
        match verdict.class {
            StatusClass::Success if body.iter().all(u8::is_ascii_whitespace) => {
                Outcome::Success(Value::Null)
            }
            StatusClass::Success => match serde_json::from_slice(body) {
                Ok(value) => Outcome::Success(value),
                Err(e) => Outcome::TransportError(TransportError::Body(e.to_string())),
            },
            StatusClass::ClientError => Outcome::ClientError {
                status,
                message: verdict.message,
            },
            StatusClass::RetryableServerError => Outcome::RetryableServerError {
                status,
                message: verdict.message,
            },
            StatusClass::NonRetryableServerError => Outcome::NonRetryableServerError {
                status,
                message: verdict.message,
            },
        }
    }

    /// HTTP status received, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Success(_) | Outcome::TransportError(_) => None,
            Outcome::ClientError { status, .. }
            | Outcome::RetryableServerError { status, .. }
            | Outcome::NonRetryableServerError { status, .. } => Some(*status),
        }
    }

    /// Status to report in problem details for this outcome.
    pub fn problem_status(&self) -> u16 {
        match self {
            Outcome::Success(_) => 200,
            Outcome::TransportError(e) => e.problem_status(),
            other => other.status().unwrap_or(500),
        }
    }

    /// Short label used for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::ClientError { .. } => "client_error",
            Outcome::RetryableServerError { .. } => "retryable_server_error",
            Outcome::NonRetryableServerError { .. } => "non_retryable_server_error",
            Outcome::TransportError(_) => "transport_error",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(_) => f.write_str("success"),
            Outcome::ClientError { message, .. }
            | Outcome::RetryableServerError { message, .. }
            | Outcome::NonRetryableServerError { message, .. } => f.write_str(message),
            Outcome::TransportError(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_table() {
        let cases = [
            (200, StatusClass::Success, ""),
            (201, StatusClass::Success, ""),
            (204, StatusClass::Success, ""),
            (400, StatusClass::ClientError, BAD_REQUEST),
            (404, StatusClass::ClientError, NOT_FOUND),
            (403, StatusClass::ClientError, UNEXPECTED),
            (410, StatusClass::ClientError, UNEXPECTED),
            (503, StatusClass::RetryableServerError, UNAVAILABLE),
            (504, StatusClass::RetryableServerError, GATEWAY_TIMEOUT),
            (500, StatusClass::NonRetryableServerError, UNEXPECTED),
            (502, StatusClass::NonRetryableServerError, UNEXPECTED),
        ];

        for (status, class, message) in cases {
            let verdict = classify(status);
            assert_eq!(verdict.class, class, "status {status}");
            assert_eq!(verdict.message, message, "status {status}");
            assert_eq!(verdict.status, status);
        }
    }

    #[test]
    fn test_unregistered_and_unmapped_codes_are_unknown() {
        for status in [499, 599, 302, 301, 101, 0, 1000] {
            let verdict = classify(status);
            assert_eq!(
                verdict.class,
                StatusClass::NonRetryableServerError,
                "status {status}"
            );
            assert_eq!(verdict.message, UNKNOWN, "status {status}");
        }
    }

    #[test]
    fn test_success_body_decoding() {
        let outcome = Outcome::from_response(200, br#"{"scenario":"ok"}"#);
        assert_eq!(outcome, Outcome::Success(serde_json::json!({"scenario": "ok"})));

        assert_eq!(Outcome::from_response(204, b""), Outcome::Success(Value::Null));

        let outcome = Outcome::from_response(200, b"<html>");
        assert!(matches!(outcome, Outcome::TransportError(TransportError::Body(_))));
        assert_eq!(outcome.problem_status(), 502);
    }

    #[test]
    fn test_error_outcomes_carry_status_and_message() {
        let outcome = Outcome::from_response(503, b"down");
        assert_eq!(outcome.status(), Some(503));
        assert_eq!(outcome.to_string(), UNAVAILABLE);
        assert_eq!(outcome.label(), "retryable_server_error");

        let outcome = Outcome::from_response(404, b"");
        assert_eq!(outcome.problem_status(), 404);
        assert_eq!(outcome.to_string(), NOT_FOUND);
    }
}
