//! keepalive-httpd
//!
//! A small HTTP/1.1 server built with Tokio.
//!
//! # Architecture Overview
//!
//! ```text
//!                   ┌──────────────────────────────────────────────────────┐
//!                   │                     SERVER                           │
//!   Client bytes    │  ┌──────────┐   ┌─────────┐   ┌──────────────┐       │
//!   ────────────────┼─▶│   net    │──▶│ decoder │──▶│   routing    │       │
//!                   │  │ listener │   │         │   │ (dispatcher) │       │
//!                   │  └──────────┘   └─────────┘   └──────┬───────┘       │
//!                   │                                      │               │
//!                   │                                      ▼               │
//!   Client bytes    │  ┌──────────┐   ┌─────────────┐   ┌──────────┐       │
//!   ◀───────────────┼──│ encoder  │◀──│ compression │◀──│  policy  │       │
//!                   │  └──────────┘   └─────────────┘   └──────────┘       │
//!                   │                                                      │
//!                   │  config · lifecycle · observability                  │
//!                   └──────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use keepalive_httpd::config::{self, ServerConfig};
use keepalive_httpd::lifecycle::{signals, Shutdown};
use keepalive_httpd::net::Listener;
use keepalive_httpd::observability::logging;
use keepalive_httpd::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "keepalive-httpd")]
#[command(about = "Minimal HTTP/1.1 server with keep-alive and gzip", long_about = None)]
struct Cli {
    /// Root directory for the /files route. Omit to disable file routes.
    #[arg(long)]
    directory: Option<PathBuf>,

    /// Port to listen on (overrides listener.bind_address's port).
    #[arg(short, long)]
    port: Option<u16>,

    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "keepalive_httpd=trace".
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn into_config(self) -> Result<ServerConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => ServerConfig::default(),
        };

        if let Some(port) = self.port {
            let addr: std::net::SocketAddr = config.listener.bind_address.parse()?;
            config.listener.bind_address = std::net::SocketAddr::new(addr.ip(), port).to_string();
        }
        if let Some(directory) = self.directory {
            config.files.directory = Some(directory);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }

        config::validate_config(&config).map_err(config::ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;
    logging::init_logging(&config.observability)?;

    tracing::info!("keepalive-httpd v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        pool_size = config.listener.pool_size,
        idle_secs = config.timeouts.idle_secs,
        directory = ?config.files.directory,
        "Configuration loaded"
    );

    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    HttpServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
