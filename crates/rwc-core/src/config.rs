use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::identity::ClientIdentity;

/// Headers the client always sets itself; users may not override them.
pub const RESERVED_HEADERS: &[&str] = &[
    "content-type",
    "content-encoding",
    "user-agent",
    "x-prometheus-remote-write-version",
];

fn default_remote_timeout_secs() -> u64 {
    30
}

/// One remote-write target (a `[[remote_write]]` table in config.toml).
///
/// Immutable once handed to a `WriteClient`; the client keeps it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Optional human-readable name; the short identity is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Absolute http(s) endpoint the payload is POSTed to.
    pub url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_remote_timeout_secs")]
    pub remote_timeout_secs: u64,
    /// Treat HTTP 429 as recoverable (retry after the server's hint).
    /// When false, 429 is terminal and the caller's queue applies backpressure.
    #[serde(default)]
    pub retry_on_rate_limit: bool,
    /// Extra request headers (e.g. auth, tenant id).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl ClientConfig {
    /// Config for `url` with default timeout and no extra headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
            remote_timeout_secs: default_remote_timeout_secs(),
            retry_on_rate_limit: false,
            headers: BTreeMap::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }

    /// Check the endpoint, timeout and headers. Called by `WriteClient::new`.
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.url)
            .with_context(|| format!("invalid remote write URL: {}", self.url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!(
                "remote write URL must be http or https, got {}: {}",
                parsed.scheme(),
                self.url
            );
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            anyhow::bail!("remote write URL missing host: {}", self.url);
        }
        if self.remote_timeout_secs == 0 {
            anyhow::bail!("remote_timeout_secs must be positive for {}", self.url);
        }
        for name in self.headers.keys() {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                anyhow::bail!("empty header name for {}", self.url);
            }
            if RESERVED_HEADERS
                .iter()
                .any(|r| trimmed.eq_ignore_ascii_case(r))
            {
                anyhow::bail!("header {} is set by the client and cannot be overridden", trimmed);
            }
        }
        Ok(())
    }
}

/// Global configuration loaded from `~/.config/rwc/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RwcConfig {
    /// Remote-write targets.
    #[serde(default)]
    pub remote_write: Vec<ClientConfig>,
}

impl RwcConfig {
    /// Validate every remote and reject duplicates (same identity or same name).
    pub fn validate(&self) -> Result<()> {
        let mut identities = HashSet::new();
        let mut names = HashSet::new();
        for remote in &self.remote_write {
            remote.validate()?;
            let id = ClientIdentity::of(remote)?;
            if !identities.insert(id) {
                anyhow::bail!("duplicate remote write config for {}", remote.url);
            }
            if let Some(name) = remote.name.as_deref().filter(|n| !n.is_empty()) {
                if !names.insert(name) {
                    anyhow::bail!("duplicate remote write name: {}", name);
                }
            }
        }
        Ok(())
    }

    /// Pick a remote by name (or short identity). With no selector, the only
    /// configured remote is returned.
    pub fn select(&self, selector: Option<&str>) -> Result<&ClientConfig> {
        match selector {
            None => match self.remote_write.as_slice() {
                [only] => Ok(only),
                [] => anyhow::bail!("no remote_write targets configured"),
                _ => anyhow::bail!("several remote_write targets configured; pass --remote"),
            },
            Some(sel) => {
                for remote in &self.remote_write {
                    if remote.name.as_deref() == Some(sel) {
                        return Ok(remote);
                    }
                    if ClientIdentity::of(remote)?.short() == sel {
                        return Ok(remote);
                    }
                }
                anyhow::bail!("no remote_write target named {}", sel)
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("rwc")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RwcConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RwcConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RwcConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: RwcConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
