//! Region Latency Service
//!
//! Serves eligible-region queries over HTTP from a static latency matrix.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌───────────────────────────────────────────────┐
//!                         │              REGION LATENCY SERVICE             │
//!                         │                                                │
//!     POST /regions/      │  ┌──────────┐    ┌──────────┐    ┌──────────┐  │
//!     eligible ───────────┼─▶│   http   │───▶│ handlers │───▶│ latency  │  │
//!                         │  │  server  │    │ validate │    │  engine  │  │
//!                         │  └──────────┘    └──────────┘    └────┬─────┘  │
//!                         │                                       │        │
//!     JSON response       │  ┌──────────┐                   ┌─────▼─────┐  │
//!     ◀───────────────────┼──│ response │◀──────────────────│ matrix +  │  │
//!                         │  │  mapping │                   │ metadata  │  │
//!                         │  └──────────┘                   └───────────┘  │
//!                         │                                                │
//!                         │  config · observability · lifecycle            │
//!                         └───────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use region_latency::config::load_config;
use region_latency::http::HttpServer;
use region_latency::lifecycle::{signals, startup, Shutdown};
use region_latency::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "region-latency")]
#[command(about = "Serve eligible cloud regions by network latency", long_about = None)]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "REGION_LATENCY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(&config.observability)?;

    tracing::info!("region-latency v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let engine = match startup::load_engine(&config.data) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize latency engine");
            return Err(e.into());
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, engine);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
