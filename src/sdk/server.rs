//! One SDK listener instance.
//!
//! # Responsibilities
//! - Build the request stages and the registrar router
//! - Bind the configured transport (tcp, optionally TLS, or unix)
//! - Serve until stopped, then drain and release the socket
//! - Swap backends under the exclusive hold

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use super::backends::{BackendLock, BackendSet};
use super::middleware::{authn, authz, logging, rwlock};
use super::registrar;
use crate::auth::{Authenticator, JwtAuthenticator};
use crate::backend::{AlertStore, Cluster, VolumeDriver};
use crate::config::{ServerConfig, Transport};
use crate::error::ServerError;
use crate::lifecycle::shutdown::Shutdown;
use crate::net::listener::{remove_socket, BoundListener};
use crate::net::tls::load_tls_config;
use crate::observability::metrics;

/// How long `stop()` waits for in-flight calls before aborting the serve task.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

struct Running {
    address: String,
    shutdown: Shutdown,
    task: JoinHandle<io::Result<()>>,
    socket_path: Option<PathBuf>,
}

/// SDK endpoint bound to a single transport.
pub struct SdkServer {
    name: String,
    config: ServerConfig,
    authenticator: Option<Arc<dyn Authenticator>>,
    backends: BackendLock,
    running: Mutex<Option<Running>>,
}

impl SdkServer {
    /// Create an instance serving `driver`. Authentication is enabled when
    /// the config carries an `auth` section.
    pub fn new(
        config: ServerConfig,
        driver: Option<Arc<dyn VolumeDriver>>,
    ) -> Result<Self, ServerError> {
        let authenticator = match &config.auth {
            Some(auth) => Some(Arc::new(JwtAuthenticator::from_config(auth)?) as Arc<dyn Authenticator>),
            None => None,
        };

        Ok(Self {
            name: format!("SDK-{}", config.net),
            config,
            authenticator,
            backends: Arc::new(RwLock::new(BackendSet::with_driver(driver))),
            running: Mutex::new(None),
        })
    }

    /// Replace the authenticator built from config.
    pub fn with_authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Registrar router wrapped in the request stages. The last layer added
    /// runs first, so the guard is added last.
    pub fn router(&self) -> Router {
        let mut router = registrar::routes().layer(middleware::from_fn(logging));
        if let Some(authenticator) = &self.authenticator {
            router = router
                .layer(middleware::from_fn(authz))
                .layer(middleware::from_fn_with_state(Arc::clone(authenticator), authn));
        }
        router.layer(middleware::from_fn_with_state(Arc::clone(&self.backends), rwlock))
    }

    /// Bind the transport and start serving in the background.
    pub async fn start(&self) -> Result<(), ServerError> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return Err(ServerError::AlreadyRunning(self.name.clone()));
        }

        // 1. TLS material, tcp only
        let tls = match (&self.config.tls, self.config.net) {
            (Some(tls), Transport::Tcp) => Some(
                load_tls_config(&tls.cert_file, &tls.key_file)
                    .await
                    .map_err(|e| ServerError::transport(&self.name, e))?,
            ),
            _ => None,
        };

        // 2. Bind
        let bound = BoundListener::bind(self.config.net, &self.config.address)
            .await
            .map_err(|e| ServerError::transport(&self.name, e))?;
        let address = bound.local_address();

        // 3. Serve
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let app = self.router();

        let (task, socket_path) = match (bound, tls) {
            (BoundListener::Tcp(listener), Some(tls)) => {
                let listener = listener
                    .into_std()
                    .map_err(|e| ServerError::transport(&self.name, e))?;
                let handle = axum_server::Handle::new();
                let server = axum_server::from_tcp_rustls(listener, tls).handle(handle.clone());
                tokio::spawn(async move {
                    signal.recv().await;
                    handle.graceful_shutdown(Some(DRAIN_TIMEOUT));
                });
                let task = tokio::spawn(async move { server.serve(app.into_make_service()).await });
                (task, None)
            }
            (BoundListener::Tcp(listener), None) => {
                let task = tokio::spawn(async move {
                    axum::serve(listener, app)
                        .with_graceful_shutdown(signal.recv())
                        .await
                });
                (task, None)
            }
            (BoundListener::Unix { listener, path }, _) => {
                let task = tokio::spawn(async move {
                    axum::serve(listener, app)
                        .with_graceful_shutdown(signal.recv())
                        .await
                });
                (task, Some(path))
            }
        };

        tracing::info!(
            name = %self.name,
            address = %address,
            tls = self.config.tls.is_some() && self.config.net == Transport::Tcp,
            auth = self.authenticator.is_some(),
            "SDK server listening"
        );

        *running = Some(Running {
            address,
            shutdown,
            task,
            socket_path,
        });
        Ok(())
    }

    /// Stop accepting, drain in-flight calls and release the listener.
    /// No-op when not running.
    pub async fn stop(&self) {
        let Some(running) = self.running.lock().await.take() else {
            return;
        };

        running.shutdown.trigger();
        let mut task = running.task;
        match tokio::time::timeout(DRAIN_TIMEOUT, &mut task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => tracing::warn!(name = %self.name, error = %e, "SDK server exited with error"),
            Ok(Err(e)) => tracing::warn!(name = %self.name, error = %e, "SDK server task failed"),
            Err(_) => {
                tracing::warn!(name = %self.name, "Drain timed out, aborting");
                task.abort();
            }
        }

        if let Some(path) = running.socket_path {
            if let Err(e) = remove_socket(&path) {
                tracing::warn!(name = %self.name, path = %path.display(), error = %e, "Failed to remove socket");
            }
        }
        tracing::info!(name = %self.name, "SDK server stopped");
    }

    /// Bound address (`host:port` or socket path) while running.
    pub async fn address(&self) -> Option<String> {
        self.running.lock().await.as_ref().map(|r| r.address.clone())
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Install a volume driver. Waits for in-flight calls to finish.
    pub async fn use_driver(&self, driver: Arc<dyn VolumeDriver>) {
        let name = driver.name().to_string();
        self.backends.write().await.driver = Some(driver);
        metrics::record_backend_swap("driver");
        tracing::info!(name = %self.name, driver = %name, "Volume driver installed");
    }

    /// Install a cluster backend. Waits for in-flight calls to finish.
    pub async fn use_cluster(&self, cluster: Arc<dyn Cluster>) {
        self.backends.write().await.cluster = Some(cluster);
        metrics::record_backend_swap("cluster");
        tracing::info!(name = %self.name, "Cluster installed");
    }

    /// Install an alert store. Waits for in-flight calls to finish.
    pub async fn use_alert(&self, alert: Arc<dyn AlertStore>) {
        self.backends.write().await.alert = Some(alert);
        metrics::record_backend_swap("alert");
        tracing::info!(name = %self.name, "Alerts store installed");
    }
}

impl std::fmt::Debug for SdkServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkServer")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("auth", &self.authenticator.is_some())
            .finish()
    }
}
