//! Sheetwright CLI entry point.

use clap::Parser;

use sheetwright::cli::{Cli, Commands};
use sheetwright::infrastructure::config::ConfigLoader;
use sheetwright::infrastructure::logging::LogConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Falls back to defaults so a broken config file still surfaces its
    // error through the command below.
    let log_config = ConfigLoader::load()
        .ok()
        .and_then(|config| LogConfig::try_from(&config.logging).ok())
        .unwrap_or_default();
    let _logger = sheetwright::cli::init_logging(&log_config);

    let result = match cli.command {
        Commands::Demo(args) => sheetwright::cli::commands::demo::execute(args, cli.json).await,
        Commands::Config(command) => {
            sheetwright::cli::commands::config::execute(command, cli.json).await
        }
    };

    if let Err(err) = result {
        sheetwright::cli::handle_error(err, cli.json);
    }
}
