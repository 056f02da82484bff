//! Retry and backoff for single marketplace requests.
//!
//! The search API rate-limits aggressively and occasionally answers with
//! challenge pages instead of JSON. Every request goes through
//! [`retry_with_backoff`], which recovers from both locally and checks the
//! caller's [`StopSignal`] before each attempt.

use std::future::Future;
use std::time::Duration;

use bestseller_core::StopSignal;

use crate::error::ScraperError;

/// Attempt budget and backoff base for one request.
///
/// # Backoff schedule (with `base_delay = 800 ms`)
///
/// | Failed attempt | After HTTP 429 | After transport failure |
/// |----------------|----------------|-------------------------|
/// | 0              | 1.6 s          | 0.8 s                   |
/// | 1              | 3.2 s          | 1.6 s                   |
/// | 2              | 4.8 s          | 2.4 s                   |
///
/// A transport failure on the last attempt is returned without sleeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// `base × (attempt + 1) × 2`
    #[must_use]
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.transport_delay(attempt).saturating_mul(2)
    }

    /// `base × (attempt + 1)`
    #[must_use]
    pub fn transport_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt.saturating_add(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(6, Duration::from_millis(800))
    }
}

/// Runs `operation` until it succeeds, the attempt budget runs out, or `stop`
/// is set.
///
/// Returns `Ok(None)` when the caller stopped the run, and also when every
/// attempt was rate limited: a 429 is never surfaced as an error.
///
/// # Errors
///
/// - [`ScraperError::Network`] wrapping the last failure when every attempt
///   failed and the final one was a transport failure.
/// - Any error that is neither a 429 nor a transport failure, immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    stop: &StopSignal,
    mut operation: F,
) -> Result<Option<T>, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    for attempt in 0..policy.max_attempts {
        if stop.is_stopped() {
            tracing::debug!(attempt, "stop requested — abandoning request");
            return Ok(None);
        }

        let err = match operation().await {
            Ok(value) => return Ok(Some(value)),
            Err(err) => err,
        };

        let delay = if matches!(err, ScraperError::RateLimited { .. }) {
            policy.rate_limit_delay(attempt)
        } else if err.is_transport() {
            if attempt + 1 >= policy.max_attempts {
                return Err(ScraperError::Network {
                    attempts: policy.max_attempts,
                    source: Box::new(err),
                });
            }
            policy.transport_delay(attempt)
        } else {
            return Err(err);
        };

        tracing::warn!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "marketplace request failed — retrying after backoff"
        );
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    tracing::warn!(
        max_attempts = policy.max_attempts,
        "rate limited on every attempt — treating response as empty"
    );
    Ok(None)
}
