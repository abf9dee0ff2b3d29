//! Minimal HTTP/1.1 server for store integration tests.
//!
//! Answers every request with a fixed status, optional `Retry-After`, and a
//! body, optionally after a delay. The status can be changed while running.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u32,
    pub reason: &'static str,
    pub retry_after: Option<String>,
    pub body: Vec<u8>,
    /// Wait this long before answering (simulates a slow endpoint).
    pub delay: Duration,
}

impl Reply {
    pub fn new(status: u32, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            retry_after: None,
            body: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn retry_after(mut self, value: &str) -> Self {
        self.retry_after = Some(value.to_string());
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Handle to a running server. The server runs until the process exits.
pub struct StatusServer {
    pub url: String,
    reply: Arc<Mutex<Reply>>,
    requests: Arc<AtomicUsize>,
    last_request: Arc<Mutex<String>>,
}

impl StatusServer {
    /// Change the status code of subsequent replies.
    pub fn set_status(&self, status: u32, reason: &'static str) {
        let mut reply = self.reply.lock().unwrap();
        reply.status = status;
        reply.reason = reason;
    }

    /// Number of requests received so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Raw head and body of the most recent request.
    pub fn last_request(&self) -> String {
        self.last_request.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread answering with `reply`.
pub fn start(reply: Reply) -> StatusServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let reply = Arc::new(Mutex::new(reply));
    let requests = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(String::new()));
    {
        let reply = Arc::clone(&reply);
        let requests = Arc::clone(&requests);
        let last_request = Arc::clone(&last_request);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let reply = reply.lock().unwrap().clone();
                let requests = Arc::clone(&requests);
                let last_request = Arc::clone(&last_request);
                thread::spawn(move || handle(stream, &reply, &requests, &last_request));
            }
        });
    }
    StatusServer {
        url: format!("http://127.0.0.1:{}/api/v1/write", port),
        reply,
        requests,
        last_request,
    }
}

/// A URL nothing listens on (bound then released).
pub fn closed_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/v1/write", port)
}

fn handle(
    mut stream: TcpStream,
    reply: &Reply,
    requests: &AtomicUsize,
    last_request: &Mutex<String>,
) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    requests.fetch_add(1, Ordering::SeqCst);
    *last_request.lock().unwrap() = request;

    if !reply.delay.is_zero() {
        thread::sleep(reply.delay);
    }
    let retry_after = match &reply.retry_after {
        Some(v) => format!("Retry-After: {}\r\n", v),
        None => String::new(),
    };
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        reply.status,
        reply.reason,
        reply.body.len(),
        retry_after
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&reply.body);
}

/// Reads the request head and a `Content-Length` body.
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = find_head_end(&buf) {
            let head = String::from_utf8_lossy(&buf[..end]).into_owned();
            let want = content_length(&head);
            while buf.len() < end + want {
                let n = stream.read(&mut chunk).ok()?;
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return Some(String::from_utf8_lossy(&buf).into_owned());
        }
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| p + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse().ok())
        .unwrap_or(0)
}
