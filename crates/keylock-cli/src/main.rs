//! Keylock CLI entry point.

use clap::Parser;
use keylock_cli::{load_config, logging, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Default logging if the config cannot be read; the command reports it.
    let logging_config = cli
        .config_path()
        .and_then(|path| load_config(&path))
        .map(|config| config.logging)
        .unwrap_or_default();
    logging::init(&logging_config, cli.verbose);

    // Run the command
    run(cli).await
}
