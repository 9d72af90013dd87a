//! Bounded retry loop around one adapter invocation
//!
//! The schedule is deterministic on purpose: delays are fixed functions of
//! the attempt index, with no jitter, so scripted tests reproduce the exact
//! same attempt/sleep sequence every run. Under heavy concurrent load this
//! trades away thundering-herd resistance; that limitation is documented
//! rather than silently fixed.

use crate::protocol::{GenerationOutcome, GenerationRequest};
use crate::providers::adapter::ProviderAdapter;
use crate::providers::error::RetryClass;
use crate::providers::safety::fallback_text;
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the retry loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per `generate` call, including the first
    pub max_attempts: u32,

    /// One backoff time unit. Production uses one second; tests shrink it.
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before re-attempting after a throttling signal: `(n+1) * 2`
    /// units for attempt index `n`.
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.backoff_unit * ((attempt + 1) * 2)
    }

    /// Delay before re-attempting after a generic transient failure: one
    /// fixed unit regardless of attempt index.
    pub fn transient_delay(&self) -> Duration {
        self.backoff_unit
    }
}

/// Drives one adapter's `invoke` + `extract_text` pair to a single outcome.
///
/// Owns no state across calls; each `run` carries its own attempt counter and
/// suspends only while awaiting the backend or sleeping out a backoff.
pub struct RetryController {
    policy: RetryPolicy,
}

impl RetryController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run the full retry loop for one request.
    ///
    /// Exactly one outcome is produced; intermediate failures are discarded
    /// in favor of the next attempt and never leak to the caller.
    pub async fn run(
        &self,
        adapter: &dyn ProviderAdapter,
        request: &GenerationRequest,
    ) -> GenerationOutcome {
        let max_attempts = self.policy.max_attempts;

        for attempt in 0..max_attempts {
            debug!(
                backend = adapter.name(),
                attempt,
                max_attempts,
                "generation attempt"
            );

            let result = match adapter.invoke(request).await {
                Ok(raw) => adapter.extract_text(raw),
                Err(err) => Err(err),
            };

            let error = match result {
                Ok(text) => return GenerationOutcome::Success(text),
                Err(error) => error,
            };

            let is_last = attempt + 1 >= max_attempts;
            match error.retry_class() {
                RetryClass::RateLimited => {
                    if is_last {
                        warn!(backend = adapter.name(), "rate limited, retries exhausted");
                        return GenerationOutcome::RateLimited;
                    }
                    let delay = self.policy.rate_limit_delay(attempt);
                    warn!(
                        backend = adapter.name(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        retry_after_secs = error.retry_after_secs(),
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryClass::Transient => {
                    if is_last {
                        warn!(
                            backend = adapter.name(),
                            error = %error,
                            "provider error, retries exhausted"
                        );
                        return GenerationOutcome::ProviderError(error.to_string());
                    }
                    let delay = self.policy.transient_delay();
                    warn!(
                        backend = adapter.name(),
                        attempt,
                        error = %error,
                        "provider error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                // A safety verdict won't change on retry; absorb it into the
                // fixed fallback sentence so callers see ordinary text.
                RetryClass::Filtered(reason) => {
                    debug!(
                        backend = adapter.name(),
                        %reason,
                        "content filtered, returning fallback"
                    );
                    return GenerationOutcome::Filtered {
                        reason,
                        text: fallback_text(reason),
                    };
                }
                // Unknown failure class; retrying could mask a real defect.
                RetryClass::Fatal => {
                    warn!(backend = adapter.name(), error = %error, "fatal error");
                    return GenerationOutcome::Fatal(error.to_string());
                }
            }
        }

        // max_attempts is fixed at 3; a zero-attempt policy is a programming
        // error rather than a reachable configuration.
        GenerationOutcome::Fatal("retry policy allowed no attempts".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_unit, Duration::from_secs(1));
    }

    #[test]
    fn test_rate_limit_delays_scale_with_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.rate_limit_delay(0), Duration::from_secs(2));
        assert_eq!(policy.rate_limit_delay(1), Duration::from_secs(4));
        assert_eq!(policy.rate_limit_delay(2), Duration::from_secs(6));
    }

    #[test]
    fn test_transient_delay_is_fixed() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.transient_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_delays_follow_backoff_unit() {
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff_unit: Duration::from_millis(10),
        };
        assert_eq!(policy.rate_limit_delay(0), Duration::from_millis(20));
        assert_eq!(policy.rate_limit_delay(1), Duration::from_millis(40));
        assert_eq!(policy.transient_delay(), Duration::from_millis(10));
    }
}
