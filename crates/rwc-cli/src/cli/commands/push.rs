//! Push command: ship one encoded batch, optionally re-driving recoverable failures.

use anyhow::{Context, Result};
use rwc_core::config::RwcConfig;
use rwc_core::retry::{run_with_retry, RetryPolicy};
use rwc_core::{StoreContext, WriteClient};
use std::path::Path;

pub async fn run_push(
    cfg: &RwcConfig,
    file: &Path,
    remote: Option<&str>,
    attempts: u32,
) -> Result<()> {
    if attempts == 0 {
        anyhow::bail!("--retries must be at least 1");
    }
    let payload = tokio::fs::read(file)
        .await
        .with_context(|| format!("read {}", file.display()))?;
    let client = WriteClient::from_config(cfg.select(remote)?.clone())?;
    let policy = RetryPolicy {
        max_attempts: attempts,
        ..RetryPolicy::default()
    };
    let ctx = StoreContext::background();

    tracing::info!(
        "pushing {} bytes from {} to {} ({})",
        payload.len(),
        file.display(),
        client.name(),
        client.endpoint()
    );
    run_with_retry(&policy, &ctx, || client.store_async(ctx.clone(), payload.clone()))
        .await
        .with_context(|| format!("push to {} failed", client.endpoint()))?;
    println!("pushed {} bytes to {}", payload.len(), client.name());
    Ok(())
}
