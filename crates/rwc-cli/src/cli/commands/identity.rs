//! Identity command: list configured remotes with their identity hash.

use anyhow::Result;
use rwc_core::config::RwcConfig;
use rwc_core::WriteClient;

pub fn run_identity(cfg: &RwcConfig) -> Result<()> {
    if cfg.remote_write.is_empty() {
        println!("no remote_write targets configured");
        return Ok(());
    }
    for remote in &cfg.remote_write {
        let client = WriteClient::from_config(remote.clone())?;
        println!("{}  {}  {}", client.identity(), client.name(), client.endpoint());
    }
    Ok(())
}
