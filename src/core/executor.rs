//! Retrying, cancellable execution of a single `RequestSpec`.
//!
//! Attempts run strictly one after another. Each attempt is raced against its
//! own timeout and the caller's `CancellationToken`; losing the race drops the
//! transport future, which aborts the in-flight request. Between attempt `i`
//! and `i + 1` the executor sleeps `backoff_base * i`, again racing the token.

use crate::core::cancel::{CancelReason, CancellationToken};
use crate::domain::model::{FailureKind, RequestOutcome, RequestSpec};
use crate::domain::ports::{Transport, TransportResponse};
use std::time::Duration;

pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(1000);

pub struct RequestExecutor<T: Transport> {
    transport: T,
    backoff_base: Duration,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }

    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }

    /// Delay inserted after attempt `attempt` (1-based) fails.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base.saturating_mul(attempt)
    }

    /// Runs `spec` to completion.
    ///
    /// `RequestSpec::validate` is not applied here: `max_attempts == 0` runs a
    /// single attempt and `timeout_ms == 0` is clamped to 1 ms.
    pub async fn execute(&self, spec: RequestSpec, cancel: &CancellationToken) -> RequestOutcome {
        // 至少一次嘗試，逾時不可為 0
        let max_attempts = spec.max_attempts.max(1);
        let timeout = Duration::from_millis(spec.timeout_ms.max(1));

        let mut attempt = 1;
        loop {
            tracing::debug!(
                "Attempt {}/{}: {} {}",
                attempt,
                max_attempts,
                spec.method,
                spec.url
            );

            let failure = tokio::select! {
                biased;
                reason = cancel.cancelled() => return cancelled_outcome(reason),
                result = tokio::time::timeout(timeout, self.transport.send(&spec)) => {
                    match result {
                        Ok(Ok(response)) => match interpret_response(response) {
                            RequestOutcome::Success(payload) => {
                                tracing::info!("✅ {} succeeded on attempt {}", spec.url, attempt);
                                return RequestOutcome::Success(payload);
                            }
                            RequestOutcome::Failure(kind) => kind,
                        },
                        Ok(Err(message)) => FailureKind::Network(message),
                        Err(_elapsed) => FailureKind::Timeout,
                    }
                }
            };

            if !failure.is_retryable() {
                tracing::warn!("❌ {} failed without retry: {}", spec.url, failure);
                return RequestOutcome::Failure(failure);
            }

            if attempt >= max_attempts {
                tracing::warn!(
                    "❌ {} failed after {} attempt(s): {}",
                    spec.url,
                    attempt,
                    failure
                );
                return RequestOutcome::Failure(failure);
            }

            let delay = self.backoff_delay(attempt);
            tracing::warn!(
                "🔄 Attempt {} failed ({}), retrying in {:?}",
                attempt,
                failure,
                delay
            );

            tokio::select! {
                biased;
                reason = cancel.cancelled() => return cancelled_outcome(reason),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}

fn cancelled_outcome(reason: CancelReason) -> RequestOutcome {
    tracing::warn!("⏹️ Request aborted: {:?}", reason);
    match reason {
        CancelReason::DeadlineElapsed => RequestOutcome::Failure(FailureKind::Timeout),
        CancelReason::Requested => RequestOutcome::Failure(FailureKind::Cancelled),
    }
}

/// Turns a completed round-trip into an outcome.
///
/// Non-2xx statuses and JSON objects carrying an `error` field are `Server`
/// failures; an unparseable body is a `Network` failure. An `error` that is
/// `null`, `false`, `0` or `""` counts as absent.
pub fn interpret_response(response: TransportResponse) -> RequestOutcome {
    let parsed = serde_json::from_str::<serde_json::Value>(&response.body);

    if !response.is_success() {
        let message = parsed
            .ok()
            .as_ref()
            .and_then(error_message)
            .unwrap_or_else(|| response.body.trim().to_string());
        return RequestOutcome::Failure(FailureKind::Server {
            code: response.status,
            message,
        });
    }

    let payload = match parsed {
        Ok(payload) => payload,
        Err(e) => {
            return RequestOutcome::Failure(FailureKind::Network(format!(
                "malformed response body: {}",
                e
            )))
        }
    };

    if let Some(message) = error_message(&payload) {
        return RequestOutcome::Failure(FailureKind::Server {
            code: response.status,
            message,
        });
    }

    RequestOutcome::Success(payload)
}

fn error_message(payload: &serde_json::Value) -> Option<String> {
    match payload.get("error")? {
        serde_json::Value::Null | serde_json::Value::Bool(false) => None,
        serde_json::Value::String(message) if message.is_empty() => None,
        serde_json::Value::Number(n) if n.as_f64() == Some(0.0) => None,
        serde_json::Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}
