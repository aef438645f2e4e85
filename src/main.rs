//! SideShift proxy server.
//!
//! Re-exposes every SideShift API method as an HTTP route, backed by the
//! resilient client.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                SIDESHIFT PROXY               │
//!     Client Request     │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ───────────────────┼─▶│  http   │───▶│ routes  │───▶│  client  │  │
//!                        │  │ server  │    │         │    │   api    │  │
//!                        │  └─────────┘    └─────────┘    └────┬─────┘  │
//!                        │                                     ▼        │
//!                        │                               ┌──────────┐   │
//!     Client Response    │  ┌──────────┐                 │  engine  │   │      SideShift
//!     ◀──────────────────┼──│ response │◀────────────────│ + retry  │◀──┼────── API
//!                        │  └──────────┘                 └──────────┘   │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sideshift_client::config::loader::{load_config, load_from_env};
use sideshift_client::observability::{logging, metrics};
use sideshift_client::{ProxyServer, Shutdown, SideshiftClient};

#[derive(Parser)]
#[command(name = "sideshift-proxy")]
#[command(about = "HTTP proxy for the SideShift API", long_about = None)]
struct Args {
    /// TOML configuration file; without it everything comes from the environment
    #[arg(short, long, env = "SIDESHIFT_PROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "sideshift-proxy starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.client.base_url,
        max_retries = config.client.retries.max_retries,
        "Configuration loaded"
    );

    let metrics_handle = if config.observability.metrics_enabled {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let client = SideshiftClient::new(config.client.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = ProxyServer::new(config, client, metrics_handle);
    let stopped = shutdown.subscribe();
    let _signals = shutdown.trigger_on_signal();

    server.run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
