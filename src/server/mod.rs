//! Server orchestration utilities.
//!
//! This module exposes the command-line interface and the helpers that
//! power the server binary. The binary stays a thin wrapper that only
//! needs to call [`run`].

pub mod admin;
pub mod cli;
pub mod http;

use anyhow::Result;
use clap::Parser;
pub use cli::{AppConfig, Cli, Commands, CreateAdminArgs};

/// Parse CLI arguments and execute the requested command or server.
///
/// # Errors
///
/// Returns any error emitted while resolving configuration or starting
/// the runtime.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli).await
}

/// Execute the server logic using an already parsed [`Cli`].
///
/// # Errors
///
/// Propagates any failure reported by the selected command or the HTTP
/// runtime.
pub async fn run_with_cli(cli: Cli) -> Result<()> {
    let cfg = AppConfig::load(&cli)?;
    if let Some(command) = cli.command {
        admin::run_command(command, &cfg).await
    } else {
        http::serve(cfg).await
    }
}
