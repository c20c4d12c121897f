//! Cheongyak CLI - Command-line interface
//!
//! Runs the detail proxy server or performs one-off lookups.

mod commands;

use cheongyak_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cheongyak")]
#[command(about = "Bunyanggwon detail proxy for the 청약홈 API")]
struct Cli {
    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, global = true, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), None)?;

    commands::handle_command(cli.command).await
}
