//! Bounded retry with capped exponential back-off for MarketCheck requests.
//!
//! Only rate limiting (429) and server errors (5xx) are retried. Network
//! failures, client errors and API error envelopes are returned immediately.

use std::future::Future;
use std::time::Duration;

use vinval_core::AppConfig;

use crate::error::ProviderError;

/// Attempt budget and back-off schedule for one logical request.
///
/// With the defaults a request is tried at most 3 times, sleeping 1 s and
/// then 2 s between attempts. Delays double per retry and never exceed
/// `max_delay_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 are treated as 1.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay_ms: config.backoff_base_ms,
            max_delay_ms: config.backoff_max_ms,
        }
    }

    /// Sleep before retry number `retry` (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(32);
        let computed = self.base_delay_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(computed.min(self.max_delay_ms))
    }
}

pub(crate) fn is_retriable(err: &ProviderError) -> bool {
    matches!(
        err,
        ProviderError::RateLimited { .. } | ProviderError::ServerError { .. }
    )
}

/// Runs `operation` until it succeeds, fails with a non-retriable error, or
/// the policy's attempt budget is spent. The last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_for(attempt);
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    error = %err,
                    "MarketCheck transient error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
