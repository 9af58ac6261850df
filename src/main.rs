//! Local Rust Playground Server
//!
//! Executes code submitted by documentation playgrounds with a local Rust
//! toolchain.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │               PLAYGROUND SERVER                  │
//!                      │                                                  │
//!   POST /execute      │  ┌─────────┐    ┌──────────┐    ┌────────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ handlers │───▶│  executor  │  │
//!                      │  │ server  │    │ validate │    │ CargoRunner│  │
//!                      │  └─────────┘    └──────────┘    └─────┬──────┘  │
//!                      │                                       │         │
//!                      │                                       ▼         │
//!   {success, result,  │                               ┌────────────┐    │
//!    error}            │                               │ temp cargo │    │
//!   ◀──────────────────┼───────────────────────────────│  project   │    │
//!                      │                               └─────┬──────┘    │
//!                      │                                     │           │
//!                      │                                     ▼           │
//!                      │                               ┌────────────┐    │
//!                      │                               │ toolchain  │    │
//!                      │                               │managed/sys │    │
//!                      │                               └────────────┘    │
//!                      │                                                  │
//!                      │  config · observability · lifecycle (shutdown)   │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use local_playground::config::{load_config, PlaygroundConfig};
use local_playground::executor::{CargoRunner, Toolchain};
use local_playground::http::PlaygroundServer;
use local_playground::lifecycle::Shutdown;
use local_playground::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "local-playground")]
#[command(about = "Local execution server for Rust documentation playgrounds", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configured bind address
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlaygroundConfig::default(),
    };
    if let Some(port) = args.port {
        config.server.set_port(port)?;
    }

    logging::init_logging(config.observability.log_format, logging::SERVER_FILTER);
    tracing::info!("local-playground v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.server.bind_address,
        workspace = %config.executor.workspace_dir,
        timeout_secs = config.executor.timeout_secs,
        toolchain = ?config.executor.toolchain,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let toolchain = Toolchain::new(config.executor.toolchain, &config.executor.workspace_dir);
    toolchain.ensure_installed(&reqwest::Client::new()).await?;
    let toolchain_status = toolchain.describe();
    let runner = CargoRunner::new(toolchain, &config.executor);

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = PlaygroundServer::new(&config.server, Arc::new(runner), toolchain_status);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
