//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sheetwright")]
#[command(about = "Sheetwright - review-gated spreadsheet analyst session", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scripted turn end to end and print the resulting session
    Demo(DemoArgs),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// What the user asks the assistant
    pub utterance: String,

    /// Session mode: ask or analyst (defaults to the configured mode)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Approve every tool invocation once the turn completes
    #[arg(long)]
    pub approve_all: bool,

    /// Accept the proposed plan with every step selected
    #[arg(long)]
    pub accept_plan: bool,

    /// Record a committed snapshot at the end
    #[arg(long)]
    pub commit: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Load from this file instead of the project hierarchy
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
