//! CLI entry point - the composition root.
//!
//! Parses arguments, initializes logging, and hands off to the Axum
//! adapter's `start_server`.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatrelay_axum::{ServerConfig, start_server};

#[derive(Debug, Parser)]
#[command(name = "chatrelay", version, about = "OpenAI-compatible bridge over a WebSocket backend")]
struct Cli {
    /// Port for the HTTP API server
    #[arg(long, default_value_t = 8000, env = "CHATRELAY_PORT")]
    port: u16,

    /// Dedicated backend WebSocket intake port (0 disables the extra listener)
    #[arg(long, default_value_t = 8765, env = "CHATRELAY_BACKEND_PORT")]
    backend_port: u16,

    /// Seconds to wait when forwarding a prompt to the backend
    #[arg(long, default_value_t = 10)]
    send_timeout: u64,

    /// Seconds to wait for each token while draining a turn
    #[arg(long, default_value_t = 10)]
    recv_timeout: u64,

    /// Allowed CORS origin (repeatable; default allows all origins)
    #[arg(long = "allow-origin")]
    allow_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = ServerConfig::with_defaults();
    config.port = cli.port;
    config.backend_port = (cli.backend_port != 0).then_some(cli.backend_port);
    config.send_timeout = Duration::from_secs(cli.send_timeout);
    config.recv_timeout = Duration::from_secs(cli.recv_timeout);
    if !cli.allow_origins.is_empty() {
        config = config.with_allowed_origins(cli.allow_origins);
    }

    tracing::info!(
        port = config.port,
        backend_port = ?config.backend_port,
        "starting chatrelay"
    );
    start_server(config).await
}
