//! Retry-After hint parsing.

use std::time::Duration;

/// Delay reported when the server gives no usable hint. Zero means "no hint";
/// the caller falls back to its own backoff schedule.
pub const DEFAULT_BACKOFF: Duration = Duration::ZERO;

/// Convert a `Retry-After` header value into a delay.
///
/// Only the delay-seconds form is understood. HTTP-dates, negative numbers,
/// fractions and empty values all yield `DEFAULT_BACKOFF`; this never fails.
pub fn retry_after_duration(hint: &str) -> Duration {
    match hint.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => DEFAULT_BACKOFF,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds() {
        assert_eq!(retry_after_duration("120"), Duration::from_secs(120));
        assert_eq!(retry_after_duration("5"), Duration::from_secs(5));
        assert_eq!(retry_after_duration("0"), Duration::ZERO);
        assert_eq!(retry_after_duration(" 7 "), Duration::from_secs(7));
    }

    #[test]
    fn date_time_falls_back_to_default() {
        assert_eq!(
            retry_after_duration("Mon, 02 Jan 2006 15:04:05 MST"),
            DEFAULT_BACKOFF
        );
        assert_eq!(
            retry_after_duration("Wed, 21 Oct 2015 07:28:00 GMT"),
            DEFAULT_BACKOFF
        );
    }

    #[test]
    fn missing_or_malformed_falls_back_to_default() {
        assert_eq!(retry_after_duration(""), DEFAULT_BACKOFF);
        assert_eq!(retry_after_duration("-5"), DEFAULT_BACKOFF);
        assert_eq!(retry_after_duration("1.5"), DEFAULT_BACKOFF);
        assert_eq!(retry_after_duration("soon"), DEFAULT_BACKOFF);
        assert_eq!(retry_after_duration("99999999999999999999999"), DEFAULT_BACKOFF);
    }
}
