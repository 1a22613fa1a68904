//! Tenant-tagging remote-write forwarder.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client (POST, Bearer token)
//!     ──────────────────────────▶ ┌──────────────────────────────────────────┐
//!                                 │ request id → trace → authorize (tenant)   │
//!                                 │        → receive (method gate, forward)   │
//!     200 / 401 / 405 / 500 / 502 └──────────────────┬───────────────────────┘
//!     ◀──────────────────────────                    │ POST + THANOS-TENANT
//!                                                    ▼
//!                                          Upstream receive endpoint
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use receive_forwarder::config::{load_config, ConfigError};
use receive_forwarder::observability::{logging, metrics};
use receive_forwarder::{ForwarderConfig, HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "receive-forwarder")]
#[command(about = "Forward authenticated write requests to a single upstream, tagged with the tenant", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    listen: Option<String>,

    /// Override `forward.url`.
    #[arg(long)]
    forward_url: Option<String>,
}

impl Cli {
    fn load(&self) -> Result<ForwarderConfig, ConfigError> {
        load_config(self.config.as_deref(), |config| {
            if let Some(listen) = &self.listen {
                config.listener.bind_address = listen.clone();
            }
            if let Some(url) = &self.forward_url {
                config.forward.url = url.clone();
            }
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.load()?;

    logging::init(&config.observability.log_level)?;

    tracing::info!("receive-forwarder v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        forward_url = %config.forward.url,
        timeout_secs = config.forward.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let serve = server.run(listener, shutdown.subscribe());
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => result?,
        _ = receive_forwarder::lifecycle::signals::trigger_on_signal(&shutdown) => serve.await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
