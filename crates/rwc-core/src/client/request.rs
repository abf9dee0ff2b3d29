//! Build the curl handle for one remote-write POST.

use curl::easy::{Easy, List};
use std::time::Duration;

use crate::config::ClientConfig;

pub const USER_AGENT: &str = concat!("rwc/", env!("CARGO_PKG_VERSION"));
pub const REMOTE_WRITE_VERSION: &str = "0.1.0";

/// Smallest timeout handed to curl; a zero timeout means "none" to libcurl.
const MIN_TIMEOUT: Duration = Duration::from_millis(1);

/// Protocol headers sent with every request, before user headers.
pub(crate) fn protocol_headers() -> [String; 4] {
    [
        "Content-Encoding: snappy".to_string(),
        "Content-Type: application/x-protobuf".to_string(),
        format!("X-Prometheus-Remote-Write-Version: {}", REMOTE_WRITE_VERSION),
        // Send the body straight away instead of waiting for 100-continue.
        "Expect:".to_string(),
    ]
}

/// POST of `payload` to the configured URL, bounded by `timeout`.
///
/// Redirects are not followed: a 3xx is reported to the classifier as-is.
pub(crate) fn build(
    config: &ClientConfig,
    payload: &[u8],
    timeout: Duration,
) -> Result<Easy, curl::Error> {
    let mut easy = Easy::new();
    easy.url(&config.url)?;
    easy.post(true)?;
    easy.post_fields_copy(payload)?;
    easy.follow_location(false)?;
    easy.timeout(timeout.max(MIN_TIMEOUT))?;
    // Needed for the progress callback that watches the cancel token.
    easy.progress(true)?;
    easy.useragent(USER_AGENT)?;

    let mut list = List::new();
    for line in protocol_headers() {
        list.append(&line)?;
    }
    for (k, v) in &config.headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    easy.http_headers(list)?;
    Ok(easy)
}
