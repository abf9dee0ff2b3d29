use std::time::Duration;

use super::error::StoreError;

/// High-level classification of an error for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read, or the caller's deadline).
    Timeout,
    /// Server asked us to slow down (429).
    Throttled,
    /// Network-level failure (connection refused/reset, DNS, etc.).
    Connection,
    /// Server-side failure (5xx).
    Http5xx(u16),
    /// Caller cancelled the attempt.
    Cancelled,
    /// Any other error.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Caller-side backoff for re-driving a single-attempt store.
///
/// A non-zero server hint is used as-is; otherwise the delay doubles from
/// `min_backoff` per attempt, capped at `max_backoff`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// First backoff delay when the server gives no hint.
    pub min_backoff: Duration,
    /// Upper bound on the computed backoff.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            min_backoff: Duration::from_millis(30),
            max_backoff: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, never retry.
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Decide what to do after `err` on `attempt` (1-based).
    pub fn decide(&self, attempt: u32, err: &StoreError) -> RetryDecision {
        if attempt >= self.max_attempts || !err.is_recoverable() {
            return RetryDecision::NoRetry;
        }
        if let Some(hint) = err.retry_after().filter(|d| !d.is_zero()) {
            return RetryDecision::RetryAfter(hint);
        }
        // base * 2^(attempt-1), capped.
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        let delay = self.min_backoff.saturating_mul(exp).min(self.max_backoff);
        RetryDecision::RetryAfter(delay)
    }
}
