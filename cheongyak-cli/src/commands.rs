//! CLI command implementations

use anyhow::Context;
use cheongyak_core::{CheongyakConfig, DetailLookupHandler, Identifier, RuntimeMode};
use clap::Subcommand;
use tracing::info;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Server {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
        /// Runtime mode (production, development)
        #[arg(long)]
        mode: Option<RuntimeMode>,
    },
    /// Look up one bunyanggwon detail and print the response envelope
    Lookup {
        /// House management number
        id: String,
        /// Runtime mode (production, development)
        #[arg(long)]
        mode: Option<RuntimeMode>,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the startup or serialization error of the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = CheongyakConfig::from_env();
    match command {
        Commands::Server { host, port, mode } => {
            start_server(apply_overrides(config, host, port, mode)).await
        }
        Commands::Lookup { id, mode } => lookup(apply_overrides(config, None, None, mode), id).await,
    }
}

/// Command-line flags take precedence over environment configuration.
fn apply_overrides(
    mut config: CheongyakConfig,
    host: Option<String>,
    port: Option<u16>,
    mode: Option<RuntimeMode>,
) -> CheongyakConfig {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(mode) = mode {
        config.runtime_mode = mode;
    }
    config
}

async fn start_server(config: CheongyakConfig) -> anyhow::Result<()> {
    info!("Starting server in {} mode", config.runtime_mode);
    cheongyak_web::run_server(config)
        .await
        .context("API server stopped")
}

async fn lookup(config: CheongyakConfig, id: String) -> anyhow::Result<()> {
    let handler = DetailLookupHandler::from_config(&config)
        .context("Failed to configure detail provider")?;

    let (envelope, status) = match Identifier::new(id) {
        Ok(identifier) => handler.handle(&identifier).await,
        Err(_) => DetailLookupHandler::not_found(),
    };

    eprintln!("HTTP {status}");
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
