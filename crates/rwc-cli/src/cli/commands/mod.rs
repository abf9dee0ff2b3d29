//! CLI command handlers, one per file.

mod classify;
mod config;
mod identity;
mod push;

pub use classify::run_classify;
pub use config::run_config;
pub use identity::run_identity;
pub use push::run_push;
