//! Retry loop: re-drive a single-attempt store until success or policy says stop.

use std::future::Future;
use std::time::Instant;

use super::error::StoreError;
use super::policy::{RetryDecision, RetryPolicy};
use crate::context::StoreContext;

/// Runs `f` until it succeeds or the retry policy says to stop.
///
/// On a recoverable failure, sleeps for the decided delay then tries again.
/// Stops early with `Cancelled` when `ctx` is cancelled, and returns the last
/// error when the next attempt would start after the context deadline.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    ctx: &StoreContext,
    mut f: F,
) -> Result<(), StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let mut attempt = 1u32;
    loop {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let err = match f().await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };
        let delay = match policy.decide(attempt, &err) {
            RetryDecision::NoRetry => return Err(err),
            RetryDecision::RetryAfter(d) => d,
        };
        let past_deadline = ctx.deadline().map_or(false, |dl| {
            Instant::now().checked_add(delay).map_or(true, |wake| wake >= dl)
        });
        if past_deadline {
            return Err(err);
        }
        tracing::warn!(
            "attempt {} failed ({}); retrying in {:?}",
            attempt,
            err,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
