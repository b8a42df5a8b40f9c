//! Problem details returned in place of a failed remote call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ProblemConfig;

/// Normalized error payload, shaped after RFC 7807 problem details.
///
/// Optional strings are skipped when absent or empty, so a serialized value
/// only ever carries the fields that were actually filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub status: u16,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Path of the remote resource the call targeted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub cause: Option<String>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub detail: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

impl ProblemDetails {
    /// Build the payload for a call that terminated unsuccessfully.
    pub fn new(
        config: &ProblemConfig,
        status: u16,
        instance: impl Into<String>,
        cause: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title: config.title.clone(),
            instance: instance.into(),
            cause: Some(cause.into()),
            detail: Some(config.detail.clone()),
        }
    }
}

/// What a logical call resolves to: the remote body or a problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Body(Value),
    Problem(ProblemDetails),
}

impl Reply {
    pub fn is_problem(&self) -> bool {
        matches!(self, Reply::Problem(_))
    }

    pub fn body(&self) -> Option<&Value> {
        match self {
            Reply::Body(value) => Some(value),
            Reply::Problem(_) => None,
        }
    }

    pub fn problem(&self) -> Option<&ProblemDetails> {
        match self {
            Reply::Problem(problem) => Some(problem),
            Reply::Body(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_serializes_untagged() {
        let body = Reply::Body(serde_json::json!({"scenario": "ok"}));
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"scenario":"ok"}"#);

        let problem = Reply::Problem(ProblemDetails::new(
            &ProblemConfig::default(),
            404,
            "/mock/ok",
            "Resource not found",
        ));
        let json = serde_json::to_value(&problem).unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["cause"], "Resource not found");
    }

    #[test]
    fn test_serialized_shape() {
        let problem = ProblemDetails::new(
            &ProblemConfig::default(),
            503,
            "/mock/fail",
            "Retries exhausted: 3/3",
        );

        assert_eq!(
            serde_json::to_string(&problem).unwrap(),
            r#"{"status":503,"title":"Problem accessing/updating remote resources hosted in Wiremock cloud","instance":"/mock/fail","cause":"Retries exhausted: 3/3","detail":"WireMock was told to fail in this case: you got what you mocked"}"#
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let problem = ProblemDetails {
            status: 404,
            title: String::new(),
            instance: "/mock/x".into(),
            cause: None,
            detail: Some(String::new()),
        };

        assert_eq!(
            serde_json::to_value(&problem).unwrap(),
            serde_json::json!({"status": 404, "instance": "/mock/x"})
        );
    }
}
