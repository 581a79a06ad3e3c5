//! Strictly Chess - Unified CLI
//!
//! Terminal client for a server-authoritative chess service.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_chess::{ChessApi, ClientConfig, RestChessClient};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ClientConfig::load(&cli.config)?;

    match cli.command {
        Command::Play {
            server_url,
            log_file,
            no_confirm,
        } => {
            let mut config = config;
            if let Some(url) = server_url {
                config = config.with_server_url(url);
            }
            if let Some(path) = log_file {
                config = config.with_log_file(path);
            }
            if no_confirm {
                config = config.with_confirm_new_game(false);
            }
            strictly_chess::run_tui(config).await
        }
        Command::Health { server_url } => {
            let config = match server_url {
                Some(url) => config.with_server_url(url),
                None => config,
            };
            run_health(config).await
        }
    }
}

/// Query the service health endpoint and print the answer
#[instrument(skip_all, fields(server_url = %config.server_url()))]
async fn run_health(config: ClientConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = RestChessClient::new(config.server_url(), config.request_timeout())?;
    let health = client.health().await?;
    info!(status = %health.status, active_games = health.active_games, "Service reachable");
    println!(
        "{}: {} ({} active games)",
        client.base_url(),
        health.status,
        health.active_games
    );
    Ok(())
}
