//! Classify HTTP status and curl errors for remote-write outcomes.

use crate::retry::policy::ErrorKind;

/// Upper bound, in bytes, on the response text embedded in an error message.
pub const MAX_ERR_MSG_LEN: usize = 1024;

/// Outcome category for an HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: the batch was accepted.
    Success,
    /// 5xx, or 429 when rate-limit retries are enabled.
    Recoverable,
    /// Everything else: retrying the same request will not help.
    NonRecoverable,
}

/// Decide the outcome category for `code`.
///
/// 429 is only recoverable when `retry_on_rate_limit` is set; otherwise the
/// caller's queue is expected to apply its own backpressure.
pub fn classify_status(code: u32, retry_on_rate_limit: bool) -> StatusClass {
    match code {
        200..=299 => StatusClass::Success,
        429 if retry_on_rate_limit => StatusClass::Recoverable,
        500..=599 => StatusClass::Recoverable,
        _ => StatusClass::NonRecoverable,
    }
}

/// Map an HTTP status onto the retry vocabulary (independent of the flag).
pub fn error_kind_for_status(code: u32) -> ErrorKind {
    match code {
        429 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_aborted_by_callback() {
        return ErrorKind::Cancelled;
    }
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_ssl_connect_error()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// First line of `body`, cut to at most `MAX_ERR_MSG_LEN` bytes on a char boundary.
pub fn truncate_message(body: &[u8]) -> String {
    let head = &body[..body.len().min(MAX_ERR_MSG_LEN)];
    let line = match head.iter().position(|&b| b == b'\n') {
        Some(end) => &head[..end],
        None => head,
    };
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let mut text = String::from_utf8_lossy(line).into_owned();
    if text.len() > MAX_ERR_MSG_LEN {
        let mut cut = MAX_ERR_MSG_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

/// Error text for a non-2xx response: status line plus the truncated body.
pub fn status_message(code: u32, reason: &str, body: &[u8]) -> String {
    let reason = reason.trim();
    let status = if reason.is_empty() {
        code.to_string()
    } else {
        format!("{} {}", code, reason)
    };
    format!(
        "server returned HTTP status {}: {}",
        status,
        truncate_message(body)
    )
}
