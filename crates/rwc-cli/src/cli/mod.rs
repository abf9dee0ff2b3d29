//! CLI for the rwc remote-write client.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rwc_core::config;
use std::path::PathBuf;

use commands::{run_classify, run_config, run_identity, run_push};

/// Top-level CLI for the rwc remote-write client.
#[derive(Debug, Parser)]
#[command(name = "rwc")]
#[command(about = "rwc: ship remote-write batches and inspect retry decisions", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/rwc/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Send an already-encoded payload file to a remote-write endpoint.
    Push {
        /// Path to the encoded (snappy-compressed protobuf) batch.
        file: PathBuf,
        /// Remote to use, by name or short identity (required with several remotes).
        #[arg(long)]
        remote: Option<String>,
        /// Total attempts, including the first. Recoverable failures are retried.
        #[arg(long, default_value = "1", value_name = "N")]
        retries: u32,
    },

    /// Print the identity of every configured remote.
    Identity,

    /// Show how a status code and Retry-After value would be classified.
    Classify {
        /// HTTP status code.
        status: u32,
        /// Raw Retry-After header value.
        #[arg(long, value_name = "VALUE")]
        retry_after: Option<String>,
        /// Treat 429 as recoverable.
        #[arg(long)]
        retry_on_rate_limit: bool,
    },

    /// Print the config path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        // Classify works offline and needs no config.
        if let CliCommand::Classify {
            status,
            retry_after,
            retry_on_rate_limit,
        } = &cli.command
        {
            return run_classify(*status, retry_after.as_deref(), *retry_on_rate_limit);
        }

        let (path, cfg) = match &cli.config {
            Some(path) => (path.clone(), config::load_from(path)?),
            None => (config::config_path()?, config::load_or_init()?),
        };
        tracing::debug!("loaded config from {}: {:?}", path.display(), cfg);

        match cli.command {
            CliCommand::Push {
                file,
                remote,
                retries,
            } => run_push(&cfg, &file, remote.as_deref(), retries).await?,
            CliCommand::Identity => run_identity(&cfg)?,
            CliCommand::Config => run_config(&path, &cfg)?,
            CliCommand::Classify { .. } => {}
        }

        Ok(())
    }
}
