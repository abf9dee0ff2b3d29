use rwc_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    logging::init();

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("rwc error: {:#}", err);
        std::process::exit(1);
    }
}
