//! Collect the parts of a response the classifier needs.

/// Status line reason and `Retry-After` from the final response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub reason: String,
    pub retry_after: Option<String>,
}

/// Parse collected header lines. A new status line (e.g. after `100 Continue`)
/// resets what was seen so far.
pub(crate) fn parse_headers(lines: &[String]) -> ResponseHead {
    let mut head = ResponseHead::default();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                reason: status_reason(line).to_string(),
                retry_after: None,
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("retry-after") {
                head.retry_after = Some(value.trim().to_string());
            }
        }
    }
    head
}

/// Reason phrase of a status line: "HTTP/1.1 503 Service Unavailable" -> "Service Unavailable".
fn status_reason(line: &str) -> &str {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next();
    let _code = parts.next();
    parts.next().unwrap_or("").trim()
}

/// Response body, keeping at most `cap` bytes. The rest is read and dropped
/// so the connection drains normally.
#[derive(Debug)]
pub(crate) struct BoundedBody {
    buf: Vec<u8>,
    cap: usize,
}

impl BoundedBody {
    pub fn new(cap: usize) -> Self {
        Self {
            buf: Vec::new(),
            cap,
        }
    }

    /// Append what still fits; always reports the whole chunk as consumed.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let room = self.cap.saturating_sub(self.buf.len());
        self.buf.extend_from_slice(&data[..data.len().min(room)]);
        data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parse_reason_and_retry_after() {
        let head = parse_headers(&lines(&[
            "HTTP/1.1 429 Too Many Requests",
            "Content-Type: text/plain",
            "Retry-After: 5",
            "",
        ]));
        assert_eq!(head.reason, "Too Many Requests");
        assert_eq!(head.retry_after.as_deref(), Some("5"));
    }

    #[test]
    fn retry_after_is_case_insensitive_and_optional() {
        let head = parse_headers(&lines(&["HTTP/1.1 500 Internal Server Error", "retry-after:  120 "]));
        assert_eq!(head.retry_after.as_deref(), Some("120"));
        let head = parse_headers(&lines(&["HTTP/1.1 500 Internal Server Error"]));
        assert_eq!(head.retry_after, None);
    }

    #[test]
    fn interim_response_is_discarded() {
        let head = parse_headers(&lines(&[
            "HTTP/1.1 100 Continue",
            "Retry-After: 9",
            "",
            "HTTP/1.1 503 Service Unavailable",
            "",
        ]));
        assert_eq!(head.reason, "Service Unavailable");
        assert_eq!(head.retry_after, None);
    }

    #[test]
    fn http2_status_line_without_reason() {
        let head = parse_headers(&lines(&["HTTP/2 502", "Retry-After: 3"]));
        assert_eq!(head.reason, "");
        assert_eq!(head.retry_after.as_deref(), Some("3"));
    }

    #[test]
    fn bounded_body_keeps_prefix() {
        let mut body = BoundedBody::new(8);
        assert_eq!(body.push(b"hello "), 6);
        assert_eq!(body.push(b"world!"), 6);
        assert_eq!(body.push(b"more"), 4);
        assert_eq!(body.as_bytes(), b"hello wo");
    }
}
