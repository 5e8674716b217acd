//! Retry policy and the retry loop shared by every request.

use std::collections::BTreeSet;
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

/// Default number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay before the first retry.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Default growth factor between consecutive delays.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Default upper bound on a computed delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Statuses treated as transient unless configured otherwise.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// Bounded exponential backoff.
///
/// The delay before retry `n` (the wait after attempt `n` failed) is
/// `min(max_delay, base_delay * multiplier^(n-1))`, unless the error carries
/// a rate-limit hint, in which case the hint is used as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. `0` and `1` both disable retry.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
    /// Growth factor per attempt.
    pub multiplier: f64,
    /// Ceiling for computed delays.
    pub max_delay: Duration,
    /// HTTP statuses eligible for retry.
    pub retryable_statuses: BTreeSet<u16>,
    /// Whether timeouts and connection failures are retried.
    pub retry_transport_errors: bool,
}

impl RetryPolicy {
    /// Policy with the default settings.
    pub fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
            retry_transport_errors: true,
        }
    }

    /// Policy where the first failure is always terminal.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 0,
            ..Self::new()
        }
    }

    /// Set the total attempt count.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the delay before the first retry.
    #[must_use]
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the backoff growth factor.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Set the ceiling for computed delays.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Replace the set of retryable statuses.
    #[must_use]
    pub fn with_retryable_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_statuses = statuses.into_iter().collect();
        self
    }

    /// Set whether timeouts and connection failures are retried.
    #[must_use]
    pub fn with_retry_transport_errors(mut self, retry: bool) -> Self {
        self.retry_transport_errors = retry;
        self
    }

    /// Whether `error` may be retried under this policy, ignoring the
    /// attempt budget.
    ///
    /// Authentication and validation failures are never retried, even if
    /// their status is listed in `retryable_statuses`.
    pub fn is_retryable(&self, error: &Error) -> bool {
        match error.kind() {
            ErrorKind::Authentication | ErrorKind::Validation => false,
            ErrorKind::Timeout | ErrorKind::Transport => self.retry_transport_errors,
            _ => error
                .status()
                .is_some_and(|status| self.retryable_statuses.contains(&status)),
        }
    }

    /// Computed backoff after `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else if secs <= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// How long to wait before the next attempt, or `None` if `error` after
    /// `attempt` is terminal.
    pub fn next_delay(&self, attempt: u32, error: &Error) -> Option<Duration> {
        if attempt >= self.max_attempts || !self.is_retryable(error) {
            return None;
        }
        Some(error.retry_after().unwrap_or_else(|| self.backoff(attempt)))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `operation` until it succeeds or `policy` declares the failure
/// terminal. The operation receives the 1-based attempt number.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut operation: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;

    loop {
        let error = match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };

        let Some(delay) = policy.next_delay(attempt, &error) else {
            if attempt > 1 {
                tracing::debug!(attempt, error = %error, "Giving up after retries");
            }
            return Err(error);
        };

        tracing::warn!(
            attempt,
            max_attempts = policy.max_attempts,
            status = error.status(),
            delay = ?delay,
            error = %error,
            "Request failed, retrying"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
