//! Facade over the network listener, the unix listener and the gateway.
//!
//! # Data Flow
//! ```text
//! ServerConfig
//!     → net:  SdkServer on address (tcp or unix, TLS if configured)
//!     → uds:  SdkServer on socket (unix, never TLS)
//!     → gateway on rest_port → relays to uds
//! ```
//!
//! # Design Decisions
//! - `start()` fails fast without rolling back what already started
//! - Backend swaps fan out sequentially, network instance first
//! - The facade holds no lock of its own

use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{AlertStore, Cluster, DriverRegistry, VolumeDriver};
use crate::config::{Config, ServerConfig, Transport};
use crate::error::ServerError;
use crate::gateway::Gateway;
use crate::sdk::SdkServer;

/// Driver name substituted into the socket path when none is configured.
pub const DEFAULT_DRIVER_LABEL: &str = "osd";

#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    net: SdkServer,
    uds: SdkServer,
    gateway: Option<Gateway>,
}

impl Server {
    /// Build both listener instances and the gateway. Nothing is bound yet.
    pub fn new(config: ServerConfig, registry: &DriverRegistry) -> Result<Self, ServerError> {
        if config.socket.trim().is_empty() {
            return Err(ServerError::Config(
                "Must provide unix domain socket for SDK".to_string(),
            ));
        }

        let driver = match config.driver_name.as_str() {
            "" => None,
            name => Some(
                registry
                    .get(name)
                    .ok_or_else(|| ServerError::Driver(name.to_string()))?,
            ),
        };

        let socket = socket_path(&config.socket, &config.driver_name);
        if config.net == Transport::Unix && Path::new(&config.address) == Path::new(&socket) {
            return Err(ServerError::Config(format!(
                "Network address {} is the same as the SDK unix socket",
                config.address
            )));
        }
        let uds_config = ServerConfig {
            net: Transport::Unix,
            address: socket.clone(),
            tls: None,
            ..config.clone()
        };

        let net = SdkServer::new(config.clone(), driver.clone())?;
        let uds = SdkServer::new(uds_config, driver)?;
        let gateway = config.rest_port.map(|port| Gateway::new(port, &socket));

        Ok(Self {
            config,
            net,
            uds,
            gateway,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Network listener, then unix listener, then the gateway.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.net.start().await?;
        self.uds.start().await?;
        if let Some(gateway) = &self.gateway {
            gateway.start().await?;
        }
        Ok(())
    }

    /// Stop everything that is running. No-op if never started.
    pub async fn stop(&self) {
        self.net.stop().await;
        self.uds.stop().await;
        if let Some(gateway) = &self.gateway {
            gateway.stop().await;
        }
    }

    pub async fn address(&self) -> Option<String> {
        self.net.address().await
    }

    pub async fn uds_address(&self) -> Option<String> {
        self.uds.address().await
    }

    pub async fn gateway_address(&self) -> Option<String> {
        match &self.gateway {
            Some(gateway) => gateway.address().await,
            None => None,
        }
    }

    pub async fn use_driver(&self, driver: Arc<dyn VolumeDriver>) {
        self.net.use_driver(Arc::clone(&driver)).await;
        self.uds.use_driver(driver).await;
    }

    pub async fn use_cluster(&self, cluster: Arc<dyn Cluster>) {
        self.net.use_cluster(Arc::clone(&cluster)).await;
        self.uds.use_cluster(cluster).await;
    }

    pub async fn use_alert(&self, alert: Arc<dyn AlertStore>) {
        self.net.use_alert(Arc::clone(&alert)).await;
        self.uds.use_alert(alert).await;
    }

    /// Install the driver named by each reloaded config until `updates`
    /// closes. Only the file's `driver_name` is consulted; unknown names
    /// are logged and skipped.
    pub async fn follow_reloads(
        &self,
        registry: &DriverRegistry,
        mut updates: mpsc::UnboundedReceiver<Config>,
    ) {
        let mut current = self.config.driver_name.clone();
        while let Some(reloaded) = updates.recv().await {
            let name = reloaded.server.driver_name;
            if name.is_empty() || name == current {
                continue;
            }
            match registry.get(&name) {
                Some(driver) => {
                    self.use_driver(driver).await;
                    current = name;
                }
                None => tracing::error!(driver = %name, "Unknown driver in reloaded config"),
            }
        }
    }
}

/// Replace `%s` in `template` with the driver name.
pub fn socket_path(template: &str, driver_name: &str) -> String {
    let label = if driver_name.is_empty() {
        DEFAULT_DRIVER_LABEL
    } else {
        driver_name
    };
    template.replace("%s", label)
}
