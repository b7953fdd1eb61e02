//! Documentation site gateway (v1)
//!
//! ```text
//!     Client Request
//!     ─────────────▶ request id ─▶ trace ─▶ timeout ─┬─▶ /healthz
//!                                                    ├─▶ /auth/code   (GET form, POST code)
//!                                                    ├─▶ /admin/*     (bearer auth, optional)
//!                                                    └─▶ fallback: redirect table
//!                                                          first match → 307 / 308 + Location
//!                                                          no match    → 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use docs_gateway::config::{load_config, watcher::ConfigWatcher, GatewayConfig};
use docs_gateway::observability::{logging, metrics};
use docs_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "docs-gateway")]
#[command(about = "Redirect gateway and one-time-code form for the documentation site", long_about = None)]
struct Args {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the configuration file when it changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "docs-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        config_file = ?args.config,
        redirects = config.effective_redirects().len(),
        code_slots = config.code_input.slots,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the server's lifetime.
    let (_watcher, config_updates) = match (&args.config, args.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
