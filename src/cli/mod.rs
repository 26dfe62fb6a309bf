//! Command-line interface.

pub mod commands;
pub mod output;
pub mod types;

pub use types::{Cli, Commands, ConfigCommands, DemoArgs};

use crate::infrastructure::logging::{LogConfig, LoggerImpl};

/// Install the global logger, reporting on stderr when that fails.
///
/// Commands still run without logging; the returned guard must be held for
/// the life of the process to keep file output flushing.
pub fn init_logging(config: &LogConfig) -> Option<LoggerImpl> {
    match LoggerImpl::init(config) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    }
}

/// Print a command error and exit non-zero.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    tracing::error!(error = %err, "command failed");
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{body}");
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1)
}
