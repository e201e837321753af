//! Retry policy with exponential backoff for transient fetch failures
//!
//! | Condition | Action |
//! |-----------|--------|
//! | HTTP 429, 500, 502, 503, 504 | Retry with backoff |
//! | Timeout / transport failure | Retry with backoff |
//! | Any other HTTP status | Return immediately |
//! | Attempts exhausted | `FetchError::RetryExhausted` |

use crate::config::RetryConfig;
use crate::crawler::fetcher::{FetchedResource, PageFetcher};
use crate::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// HTTP statuses worth retrying
pub const RETRYABLE_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// How many times to try a request and how long to wait between tries
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Creates a policy; `max_attempts` counts the first request and is at least 1
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Builds a policy from the `[retry]` config section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the given (1-based) failed attempt: `base * 2^(attempt-1)`, capped
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Whether an error is transient and worth another attempt
    pub fn is_retryable(error: &FetchError) -> bool {
        match error {
            FetchError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
            FetchError::Timeout { .. } | FetchError::Transport { .. } => true,
            FetchError::RetryExhausted { .. } => false,
        }
    }
}

/// Wraps a fetcher and retries transient failures according to a [`RetryPolicy`]
///
/// Holds no shared mutable state: attempt counting is local to each call.
pub struct RetryingFetcher<F> {
    inner: F,
    policy: RetryPolicy,
}

impl<F: PageFetcher> RetryingFetcher<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<F: PageFetcher> PageFetcher for RetryingFetcher<F> {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        let mut attempt = 1;

        loop {
            let error = match self.inner.fetch(url).await {
                Ok(resource) => return Ok(resource),
                Err(e) => e,
            };

            if !RetryPolicy::is_retryable(&error) {
                return Err(error);
            }

            if attempt >= self.policy.max_attempts {
                tracing::warn!("Giving up on {} after {} attempts: {}", url, attempt, error);
                return Err(FetchError::RetryExhausted {
                    url: url.to_string(),
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(attempt);
            tracing::debug!(
                "Attempt {} for {} failed ({}), retrying in {:?}",
                attempt,
                url,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
