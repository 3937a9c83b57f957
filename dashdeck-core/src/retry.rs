//! Bounded exponential backoff around one request
//!
//! Only used for the places search: a POST whose effect is read-only, so
//! replaying it on 429/5xx is safe.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::error::{Error, Result};
use crate::http::HttpResponse;

/// Retry configuration. `attempt` below is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_jitter: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// `2^attempt * base + jitter`
    pub fn delay_for(&self, attempt: u32, jitter: Duration) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt) + jitter.min(self.max_jitter)
    }

    fn random_jitter(&self) -> Duration {
        let max = self.max_jitter.as_millis() as u64;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..max))
    }

    /// Run `call` until it succeeds, fails with a non-retryable status, or
    /// attempts run out. Transport errors are returned immediately.
    pub async fn run<F, Fut>(&self, call: F) -> Result<HttpResponse>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<HttpResponse>>,
    {
        self.run_with_jitter(call, || self.random_jitter()).await
    }

    pub async fn run_with_jitter<F, Fut, J>(&self, mut call: F, mut jitter: J) -> Result<HttpResponse>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<HttpResponse>>,
        J: FnMut() -> Duration,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            let response = call().await?;
            if response.is_success() {
                return Ok(response);
            }

            if attempt + 1 < attempts && response.is_retryable() {
                let delay = self.delay_for(attempt, jitter());
                tracing::warn!(
                    status = response.status,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "retryable response, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            return Err(Error::Http {
                status: response.status,
                message: format!("API request failed: {}", response.error_detail()),
            });
        }
    }
}
