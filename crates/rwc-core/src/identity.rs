//! Stable identity for a remote-write client configuration.
//!
//! The identity names and deduplicates clients that point at the same target
//! with the same settings. It is not a security boundary.

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ClientConfig;

/// Hex chars used by `short()`.
const SHORT_LEN: usize = 6;

/// SHA-256 over the canonical JSON form of a `ClientConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientIdentity([u8; 32]);

/// Fields that change where or how the payload is sent. The display name is
/// left out so two names for the same target still collide.
#[derive(Serialize)]
struct Canonical<'a> {
    url: &'a str,
    remote_timeout_secs: u64,
    retry_on_rate_limit: bool,
    headers: &'a BTreeMap<String, String>,
}

impl ClientIdentity {
    /// Derive the identity of `config`. Fails only if serialization fails.
    pub fn of(config: &ClientConfig) -> Result<Self> {
        let canonical = Canonical {
            url: &config.url,
            remote_timeout_secs: config.remote_timeout_secs,
            retry_on_rate_limit: config.retry_on_rate_limit,
            headers: &config.headers,
        };
        let bytes = serde_json::to_vec(&canonical).context("serialize client config")?;
        Ok(Self(Sha256::digest(&bytes).into()))
    }

    /// Full digest as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First few hex chars, enough to tell clients apart in logs.
    pub fn short(&self) -> String {
        let mut s = self.to_hex();
        s.truncate(SHORT_LEN);
        s
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
