//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Discord bot that emails guild subscribers about new messages.
#[derive(Debug, Parser)]
#[command(name = "guildmail", version, about)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect to Discord and serve notifications.
    Run {
        /// Path to the TOML configuration file
        #[arg(short, long, default_value = "guildmail.toml")]
        config: PathBuf,
    },
}
