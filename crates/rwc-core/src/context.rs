//! Per-call cancellation and deadline for `WriteClient::store`.
//!
//! The cancel flag is a shared abort token: clone the context, hand one copy
//! to `store`, and call `cancel()` on the other. The transfer checks the flag
//! from curl's progress callback and stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation token plus optional deadline carried by one store call.
#[derive(Debug, Clone, Default)]
pub struct StoreContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

/// Which limit bounds a request: the caller's deadline or the client timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Deadline(Duration),
    Timeout(Duration),
}

impl Bound {
    pub fn duration(self) -> Duration {
        match self {
            Bound::Deadline(d) | Bound::Timeout(d) => d,
        }
    }
}

impl StoreContext {
    /// No deadline, not cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Same cancel token, with a deadline at `deadline`.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };
        Self {
            cancelled: Arc::clone(&self.cancelled),
            deadline: Some(deadline),
        }
    }

    /// Same cancel token, with a deadline `timeout` from now. A timeout too
    /// large to represent leaves the current deadline (if any) unchanged.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    /// Request cancellation. Every clone sharing this token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Handle for the transfer callback.
    pub(crate) fn cancel_token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Effective bound for a request started now: the shorter of the time left
    /// until the deadline and the configured timeout. `None` when the deadline
    /// has already passed.
    pub fn bound(&self, timeout: Duration) -> Option<Bound> {
        match self.deadline {
            None => Some(Bound::Timeout(timeout)),
            Some(deadline) => {
                let left = deadline.checked_duration_since(Instant::now())?;
                if left.is_zero() {
                    None
                } else if left < timeout {
                    Some(Bound::Deadline(left))
                } else {
                    Some(Bound::Timeout(timeout))
                }
            }
        }
    }
}
