//! Store error type: the failed outcomes of one store attempt.

use std::time::Duration;

use super::backoff::DEFAULT_BACKOFF;
use super::classify::{classify_curl_error, error_kind_for_status};
use super::policy::ErrorKind;

/// Why a store attempt failed. `Ok(())` is the success outcome.
///
/// Recoverable and non-recoverable failures are separate variants so callers
/// match on the variant instead of inspecting error types at runtime.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The server rejected the request for good (3xx, most 4xx, 429 without
    /// rate-limit retries). Do not resend without fixing payload or config.
    #[error("{message}")]
    NonRecoverable { status: u32, message: String },
    /// Transient server-side failure (5xx, or 429 with rate-limit retries).
    /// `retry_after` is the server's hint or `DEFAULT_BACKOFF`.
    #[error("{message}")]
    Recoverable {
        status: u32,
        message: String,
        retry_after: Duration,
    },
    /// No response was received (connection refused, DNS, timeout, reset).
    #[error("transport: {source}")]
    Transport {
        #[source]
        source: curl::Error,
        retry_after: Duration,
    },
    /// The request could not be built (bad option or header).
    #[error("request setup: {0}")]
    Setup(#[source] curl::Error),
    /// The caller cancelled before a response arrived.
    #[error("store cancelled")]
    Cancelled,
    /// The caller's deadline passed before a response arrived.
    #[error("store deadline exceeded")]
    DeadlineExceeded,
}

impl StoreError {
    pub(crate) fn transport(source: curl::Error) -> Self {
        StoreError::Transport {
            source,
            retry_after: DEFAULT_BACKOFF,
        }
    }

    /// True if the same payload may be resent after `retry_after()`.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StoreError::Recoverable { .. } | StoreError::Transport { .. }
        )
    }

    /// Delay to wait before resending; `None` for terminal errors.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            StoreError::Recoverable { retry_after, .. }
            | StoreError::Transport { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u32> {
        match self {
            StoreError::NonRecoverable { status, .. } | StoreError::Recoverable { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NonRecoverable { .. } | StoreError::Setup(_) => ErrorKind::Other,
            StoreError::Recoverable { status, .. } => error_kind_for_status(*status),
            StoreError::Transport { source, .. } => match classify_curl_error(source) {
                ErrorKind::Other => ErrorKind::Connection,
                kind => kind,
            },
            StoreError::Cancelled => ErrorKind::Cancelled,
            StoreError::DeadlineExceeded => ErrorKind::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_carries_delay() {
        let err = StoreError::Recoverable {
            status: 503,
            message: "server returned HTTP status 503 Service Unavailable: down".to_string(),
            retry_after: Duration::from_secs(5),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.kind(), ErrorKind::Http5xx(503));
        assert_eq!(
            err.to_string(),
            "server returned HTTP status 503 Service Unavailable: down"
        );
    }

    #[test]
    fn terminal_errors_have_no_delay() {
        let err = StoreError::NonRecoverable {
            status: 400,
            message: "server returned HTTP status 400 Bad Request: out of order sample".to_string(),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.retry_after(), None);
        assert_eq!(err.kind(), ErrorKind::Other);

        assert!(!StoreError::Cancelled.is_recoverable());
        assert_eq!(StoreError::Cancelled.kind(), ErrorKind::Cancelled);
        assert!(!StoreError::DeadlineExceeded.is_recoverable());
        assert_eq!(StoreError::DeadlineExceeded.status(), None);
    }

    #[test]
    fn transport_is_recoverable_with_default_backoff() {
        let err = StoreError::transport(curl::Error::new(7)); // CURLE_COULDNT_CONNECT
        assert!(err.is_recoverable());
        assert_eq!(err.retry_after(), Some(DEFAULT_BACKOFF));
        assert_eq!(err.kind(), ErrorKind::Connection);
        assert_eq!(err.status(), None);
    }
}
