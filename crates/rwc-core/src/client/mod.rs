//! Remote-write client: one POST per `store` call.
//!
//! Uses the curl crate (libcurl). `store` performs exactly one attempt and
//! classifies the response; it never retries or sleeps. Retry scheduling is
//! up to the caller (see `retry::run_with_retry`).

mod request;
mod response;

pub use request::{REMOTE_WRITE_VERSION, USER_AGENT};

use anyhow::Result;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ClientConfig;
use crate::context::{Bound, StoreContext};
use crate::identity::ClientIdentity;
use crate::retry::{
    classify_status, retry_after_duration, status_message, StatusClass, StoreError,
    MAX_ERR_MSG_LEN,
};
use response::{BoundedBody, ResponseHead};

/// Client for a single remote-write endpoint.
///
/// Cheap to clone and safe to share between threads: the only state is the
/// immutable config and its identity.
#[derive(Debug, Clone)]
pub struct WriteClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    identity: ClientIdentity,
    config: ClientConfig,
}

impl WriteClient {
    /// Create a client for `config`, validating it first. `identity` is
    /// normally `ClientIdentity::of(&config)`.
    pub fn new(identity: ClientIdentity, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner { identity, config }),
        })
    }

    /// Create a client and derive its identity from `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let identity = ClientIdentity::of(&config)?;
        Self::new(identity, config)
    }

    pub fn identity(&self) -> ClientIdentity {
        self.inner.identity
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Configured name, or the short identity.
    pub fn name(&self) -> String {
        match self.inner.config.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.inner.identity.short(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.config.url
    }

    /// Send `payload` once and classify the result.
    ///
    /// Blocks the current thread for at most `min(ctx deadline, configured
    /// timeout)`; use `store_async` from async code.
    pub fn store(&self, ctx: &StoreContext, payload: &[u8]) -> Result<(), StoreError> {
        if ctx.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let config = &self.inner.config;
        let bound = ctx
            .bound(config.timeout())
            .ok_or(StoreError::DeadlineExceeded)?;

        let started = Instant::now();
        let mut easy =
            request::build(config, payload, bound.duration()).map_err(StoreError::Setup)?;
        let mut header_lines: Vec<String> = Vec::new();
        let mut body = BoundedBody::new(MAX_ERR_MSG_LEN);
        let cancel = ctx.cancel_token();

        {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|data| {
                    header_lines.push(header_line(data));
                    true
                })
                .map_err(StoreError::Setup)?;
            transfer
                .write_function(|data| Ok(body.push(data)))
                .map_err(StoreError::Setup)?;
            // Returning false aborts the transfer.
            transfer
                .progress_function(move |_, _, _, _| !cancel.load(Ordering::Relaxed))
                .map_err(StoreError::Setup)?;
            if let Err(e) = transfer.perform() {
                let err = transfer_error(e, ctx, bound);
                tracing::debug!(
                    "remote write to {} failed after {:?}: {}",
                    self.name(),
                    started.elapsed(),
                    err
                );
                return Err(err);
            }
        }

        let code = easy.response_code().map_err(StoreError::transport)?;
        let head = response::parse_headers(&header_lines);
        tracing::debug!(
            "remote write to {} returned HTTP {} in {:?}",
            self.name(),
            code,
            started.elapsed()
        );
        outcome(code, &head, body.as_bytes(), config.retry_on_rate_limit)
    }

    /// `store` on tokio's blocking pool.
    pub async fn store_async(&self, ctx: StoreContext, payload: Vec<u8>) -> Result<(), StoreError> {
        let client = self.clone();
        match tokio::task::spawn_blocking(move || client.store(&ctx, &payload)).await {
            Ok(res) => res,
            Err(join_err) if join_err.is_panic() => {
                std::panic::resume_unwind(join_err.into_panic())
            }
            Err(join_err) => {
                tracing::warn!("store task for {} did not complete: {}", self.name(), join_err);
                Err(StoreError::Cancelled)
            }
        }
    }
}

/// One raw header line as text. Invalid UTF-8 is replaced rather than
/// dropped so a status line always resets the parsed response head.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

/// Turn a curl failure into the matching store error. Cancellation and the
/// caller's deadline are reported as such, never as transport failures.
fn transfer_error(e: curl::Error, ctx: &StoreContext, bound: Bound) -> StoreError {
    if ctx.is_cancelled() {
        return StoreError::Cancelled;
    }
    if e.is_operation_timedout() && matches!(bound, Bound::Deadline(_)) {
        return StoreError::DeadlineExceeded;
    }
    StoreError::transport(e)
}

/// Build the outcome for a received response.
fn outcome(
    code: u32,
    head: &ResponseHead,
    body: &[u8],
    retry_on_rate_limit: bool,
) -> Result<(), StoreError> {
    let class = classify_status(code, retry_on_rate_limit);
    if class == StatusClass::Success {
        return Ok(());
    }
    let message = status_message(code, &head.reason, body);
    match class {
        StatusClass::Recoverable => Err(StoreError::Recoverable {
            status: code,
            message,
            retry_after: retry_after_duration(head.retry_after.as_deref().unwrap_or("")),
        }),
        _ => {
            tracing::warn!("remote write rejected: {}", message);
            Err(StoreError::NonRecoverable {
                status: code,
                message,
            })
        }
    }
}
