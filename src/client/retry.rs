//! Retry configuration and the shared retry helper.
//!
//! Backoff is linear: the wait after the n-th failed attempt is
//! `n * backoff_step`, so the defaults wait 1s and then 2s before giving up
//! on the third attempt.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::telemetry;
use crate::{Result, TrendPulseError};

/// Configuration for retry behaviour on transient errors.
///
/// ```rust
/// # use trendpulse::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(4)
///     .backoff_step(Duration::from_millis(250));
/// assert_eq!(config.delay_after_attempt(2), Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Unit of the linear backoff. Default: 1s.
    pub backoff_step: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_millis(1000),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config that disables retries (single attempt).
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request). Clamped to at least 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    pub fn backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    /// Delay after the given failed attempt (1-indexed): `attempt * backoff_step`.
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Run `f` until it succeeds, fails permanently, or attempts run out.
///
/// Transient errors (see [`TrendPulseError::is_transient`]) are retried with
/// linear backoff. Once attempts are exhausted the last error is wrapped in
/// [`TrendPulseError::Fetch`] annotated with `query`. Permanent errors are
/// returned unchanged on first sight.
pub(crate) async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    transport: &str,
    query: &str,
    f: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                let delay = config.delay_after_attempt(attempt);
                metrics::counter!(telemetry::RETRIES_TOTAL, "transport" => transport.to_owned())
                    .increment(1);
                warn!(
                    transport,
                    query,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying after transient error"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_transient() => {
                return Err(TrendPulseError::Fetch {
                    query: query.to_string(),
                    attempts: attempt,
                    source: Box::new(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
