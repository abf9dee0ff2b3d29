pub mod config;
pub mod logging;

pub mod client;
pub mod context;
pub mod identity;
pub mod retry;

pub use client::WriteClient;
pub use config::ClientConfig;
pub use context::StoreContext;
pub use identity::ClientIdentity;
pub use retry::StoreError;
