//! SDK server daemon.
//!
//! Loads configuration, installs the `fake` driver registry, starts the
//! network listener, the unix listener and the optional gateway, then waits
//! for SIGINT/SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use osd_sdk::backend::fake::{FakeCluster, MemoryAlerts};
use osd_sdk::backend::DriverRegistry;
use osd_sdk::config::watcher::ConfigWatcher;
use osd_sdk::config::{load_config, Config, Transport};
use osd_sdk::lifecycle::signals::wait_for_signal;
use osd_sdk::observability::{logging, metrics};
use osd_sdk::Server;

#[derive(Parser, Debug)]
#[command(name = "osd-sdk")]
#[command(about = "Storage SDK server", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Network listener address (`host:port`).
    #[arg(long)]
    address: Option<String>,

    /// Unix socket path; `%s` is replaced by the driver name.
    #[arg(long)]
    socket: Option<String>,

    /// Start the REST gateway on this port.
    #[arg(long)]
    rest_port: Option<u16>,

    /// Volume driver to install.
    #[arg(long)]
    driver: Option<String>,

    /// Reload the config file on change and swap the driver.
    #[arg(long, requires = "config")]
    watch: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.server.net = Transport::Tcp;
            config.server.address = address.clone();
        }
        if let Some(socket) = &self.socket {
            config.server.socket = socket.clone();
        }
        if let Some(port) = self.rest_port {
            config.server.rest_port = Some(port);
        }
        if let Some(driver) = &self.driver {
            config.server.driver_name = driver.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "osd-sdk starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to install metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = DriverRegistry::with_defaults();
    let server = Server::new(config.server.clone(), &registry)?;
    server.use_cluster(Arc::new(FakeCluster::new("osd-cluster"))).await;
    server.use_alert(Arc::new(MemoryAlerts::new())).await;
    server.start().await?;

    tracing::info!(
        address = ?server.address().await,
        socket = ?server.uds_address().await,
        gateway = ?server.gateway_address().await,
        driver = %config.server.driver_name,
        "osd-sdk ready"
    );

    // Keep the watcher alive until shutdown.
    let watch_path = args.config.clone().filter(|_| args.watch);
    let _watcher = match watch_path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path, config.clone());
            let watcher = watcher.run()?;
            tokio::select! {
                signal = wait_for_signal() => tracing::info!(signal, "Shutdown signal received"),
                _ = server.follow_reloads(&registry, updates) => tracing::warn!("Config watcher stopped"),
            }
            Some(watcher)
        }
        None => {
            let signal = wait_for_signal().await;
            tracing::info!(signal, "Shutdown signal received");
            None
        }
    };

    server.stop().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
