//! Outcome classification, retry hints and the caller-side retry helper.
//!
//! `classify` and `backoff` turn one HTTP response into a `StoreError` (or
//! success); `policy` and `run` are for callers that want to re-drive a
//! single-attempt store with backoff. The store path itself never sleeps.

mod backoff;
mod classify;
mod error;
mod policy;
mod run;

pub use backoff::{retry_after_duration, DEFAULT_BACKOFF};
pub use classify::{
    classify_curl_error, classify_status, error_kind_for_status, status_message,
    truncate_message, StatusClass, MAX_ERR_MSG_LEN,
};
pub use error::StoreError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
