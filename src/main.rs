//! Scenario relay (v1)
//!
//! Serves `GET /test/{scenario}` by fetching `<remote>/mock/{scenario}`.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────────┐
//!                      │                     SCENARIO RELAY                         │
//!                      │                                                            │
//!   GET /test/{s}      │  ┌─────────┐    ┌────────────┐    ┌────────────┐           │
//!   ───────────────────┼─▶│  http   │───▶│ resilience │───▶│   remote   │───────────┼──▶ Remote
//!                      │  │ server  │    │  retries   │    │ dispatcher │           │    Service
//!                      │  └─────────┘    └─────┬──────┘    └─────┬──────┘           │
//!                      │                       │ classify         │ GET /mock/{s}    │
//!   JSON body or       │                       ▼                  ▼                  │
//!   problem details    │               ┌─────────────┐    ┌─────────────┐           │
//!   ◀──────────────────┼───────────────│   problem   │    │  in-flight  │           │
//!                      │               │   details   │    │   counter   │           │
//!                      │               └─────────────┘    └─────────────┘           │
//!                      └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use scenario_relay::config::{load_config, validate_config, ConfigError, RelayConfig};
use scenario_relay::observability::{logging, metrics};
use scenario_relay::{HttpServer, RelayService, Shutdown};

#[derive(Parser)]
#[command(name = "scenario-relay")]
#[command(about = "Relays scenarios to a remote service with retries", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `remote.base_url`.
    #[arg(long)]
    base_url: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<RelayConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };

    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }
    if let Some(base_url) = &cli.base_url {
        config.remote.base_url = base_url.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    logging::init_logging(&config.observability);

    tracing::info!("scenario-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        remote = %config.remote.base_url,
        max_retries = config.retries.max_retries,
        base_delay_ms = config.retries.base_delay_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let relay = RelayService::from_config(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, relay);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
