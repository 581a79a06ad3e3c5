//! Command-line interface for strictly_chess.

use clap::{Parser, Subcommand};

/// Strictly Chess - terminal client for a chess game service
#[derive(Parser, Debug)]
#[command(name = "strictly_chess")]
#[command(about = "Play chess against a remote game service from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client config file (TOML). Defaults apply if it is missing.
    #[arg(short, long, global = true, default_value = "strictly_chess.toml")]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Game service API URL (overrides config and environment)
        #[arg(long)]
        server_url: Option<String>,

        /// Log file path (overrides config)
        #[arg(long)]
        log_file: Option<std::path::PathBuf>,

        /// Start a new game on `n` without asking first
        #[arg(long)]
        no_confirm: bool,
    },

    /// Check that the game service is reachable
    Health {
        /// Game service API URL (overrides config and environment)
        #[arg(long)]
        server_url: Option<String>,
    },
}
