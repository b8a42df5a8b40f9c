//! Retry and recovery for one logical call.
//!
//! # Responsibilities
//! - Decide whether an attempt's outcome is retried (retryable server errors,
//!   and transport failures when enabled)
//! - Execute retries sequentially with exponential backoff + jitter
//! - Resolve every terminal state to a [`Reply`]; nothing is raised to the caller
//!
//! # State Transitions
//! ```text
//! Attempting → Succeeded: 2xx with decodable body
//! Attempting → RetryScheduled: retryable outcome, attempts_made < max_attempts
//! Attempting → Failed: terminal outcome, or retryable with retries exhausted
//! RetryScheduled → Attempting: backoff elapsed
//! ```

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::Instrument;

use crate::config::{ProblemConfig, RetryConfig};
use crate::observability::{metrics, tracing::call_span};
use crate::problem::{ProblemDetails, Reply};
use crate::remote::Dispatcher;
use crate::resilience::backoff::{calculate_backoff, max_backoff};
use crate::resilience::classifier::Outcome;

/// Which outcomes are retried, how often and how far apart.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub jitter_ratio: f64,
    pub retry_transport_errors: bool,
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.base_delay_ms,
            max_delay_ms: config.max_delay_ms,
            jitter_ratio: config.jitter_ratio,
            retry_transport_errors: config.retry_transport_errors,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn is_retryable(&self, outcome: &Outcome) -> bool {
        match outcome {
            Outcome::RetryableServerError { .. } => true,
            Outcome::TransportError(_) => self.retry_transport_errors,
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        calculate_backoff(attempt, self.base_delay_ms, self.max_delay_ms, self.jitter_ratio)
    }

    /// Upper bound on one logical call when every attempt takes up to
    /// `attempt_timeout` and every retry draws the longest backoff.
    pub fn worst_case_call(&self, attempt_timeout: Duration) -> Duration {
        let attempts = attempt_timeout.saturating_mul(self.max_retries.saturating_add(1));
        (1..=self.max_retries).fold(attempts, |total, retry| {
            total.saturating_add(max_backoff(
                retry,
                self.base_delay_ms,
                self.max_delay_ms,
                self.jitter_ratio,
            ))
        })
    }
}

/// Retry bookkeeping of a single logical call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempts_made: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempts_made: 0,
            max_attempts,
        }
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn can_retry(&self) -> bool {
        self.attempts_made < self.max_attempts
    }

    /// Count one more retry and return its 1-based number.
    pub fn record_retry(&mut self) -> u32 {
        self.attempts_made += 1;
        self.attempts_made
    }

    pub fn exhausted_cause(&self) -> String {
        format!(
            "Retries exhausted: {}/{}",
            self.attempts_made, self.max_attempts
        )
    }
}

#[derive(Debug)]
enum CallState {
    Attempting,
    RetryScheduled(Duration),
    Succeeded(Value),
    Failed(ProblemDetails),
}

/// Drives logical calls from submission to a terminal [`Reply`].
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    problem: ProblemConfig,
}

impl RetryController {
    pub fn new(policy: RetryPolicy, problem: ProblemConfig) -> Self {
        Self { policy, problem }
    }

    /// Run the logical call for `scenario` to completion.
    pub async fn run(&self, dispatcher: &Dispatcher, scenario: &str) -> Reply {
        let call = dispatcher.submit(scenario);
        let span = call_span(call.id(), call.path());

        async move {
            tracing::info!(scenario = %scenario, "Fetching remote resource");
            let start_time = Instant::now();
            let mut retry = RetryState::new(self.policy.max_retries);
            let mut state = CallState::Attempting;

            let reply = loop {
                state = match state {
                    CallState::Attempting => {
                        let outcome = dispatcher.send(&call).await;
                        metrics::record_attempt(outcome.label());
                        self.next_state(outcome, &mut retry, call.path())
                    }
                    CallState::RetryScheduled(delay) => {
                        tokio::time::sleep(delay).await;
                        CallState::Attempting
                    }
                    CallState::Succeeded(body) => break Reply::Body(body),
                    CallState::Failed(problem) => break Reply::Problem(problem),
                };
            };

            let result = if reply.is_problem() { "failed" } else { "succeeded" };
            metrics::record_call(result, start_time);
            drop(call);

            tracing::info!(
                result,
                retries = retry.attempts_made(),
                in_flight = dispatcher.in_flight(),
                "Logical call finished"
            );
            reply
        }
        .instrument(span)
        .await
    }

    fn next_state(&self, outcome: Outcome, retry: &mut RetryState, instance: &str) -> CallState {
        match outcome {
            Outcome::Success(body) => {
                tracing::info!(body = %body, "Successful response arrived");
                CallState::Succeeded(body)
            }
            outcome if self.policy.is_retryable(&outcome) => {
                if retry.can_retry() {
                    let attempt = retry.record_retry();
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = retry.max_attempts(),
                        delay = ?delay,
                        status = ?outcome.status(),
                        error = %outcome,
                        "Retrying remote call"
                    );
                    metrics::record_retry();
                    CallState::RetryScheduled(delay)
                } else {
                    let cause = retry.exhausted_cause();
                    tracing::warn!(error = %outcome, cause = %cause, "Giving up on remote call");
                    CallState::Failed(ProblemDetails::new(
                        &self.problem,
                        outcome.problem_status(),
                        instance,
                        cause,
                    ))
                }
            }
            outcome => {
                tracing::info!(status = ?outcome.status(), error = %outcome, "Remote call failed");
                CallState::Failed(ProblemDetails::new(
                    &self.problem,
                    outcome.problem_status(),
                    instance,
                    outcome.to_string(),
                ))
            }
        }
    }
}
