mod cli;
mod console;
mod logging;

use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = console::run().await {
        error!(target = "vibectl", error = %err, "session failed");
        std::process::exit(1);
    }
}
