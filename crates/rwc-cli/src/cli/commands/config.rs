//! Config command: show where the config lives and what it contains.

use anyhow::Result;
use rwc_core::config::RwcConfig;
use std::path::Path;

pub fn run_config(path: &Path, cfg: &RwcConfig) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
