//! TCP and unix-domain listener binding.
//!
//! # Responsibilities
//! - Bind the configured address for either transport
//! - Clear a stale socket file and create its parent directory
//! - Remove the socket file again on release

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use tokio::net::{TcpListener, UnixListener};

use crate::config::Transport;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error("Invalid address {address}: {reason}")]
    Address { address: String, reason: String },

    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// A bound, not yet serving listener.
#[derive(Debug)]
pub enum BoundListener {
    Tcp(TcpListener),
    Unix { listener: UnixListener, path: PathBuf },
}

impl BoundListener {
    /// Bind `address` using `transport`.
    pub async fn bind(transport: Transport, address: &str) -> Result<Self, ListenerError> {
        match transport {
            Transport::Tcp => bind_tcp(address).await,
            Transport::Unix => bind_unix(Path::new(address)).await,
        }
    }

    /// Printable bound address: `host:port` or the socket path.
    pub fn local_address(&self) -> String {
        match self {
            Self::Tcp(listener) => listener
                .local_addr()
                .map(|addr| addr.to_string())
                .unwrap_or_default(),
            Self::Unix { path, .. } => path.display().to_string(),
        }
    }
}

async fn bind_tcp(address: &str) -> Result<BoundListener, ListenerError> {
    let addr: SocketAddr = tokio::net::lookup_host(address)
        .await
        .map_err(|e| ListenerError::Address {
            address: address.to_string(),
            reason: e.to_string(),
        })?
        .next()
        .ok_or_else(|| ListenerError::Address {
            address: address.to_string(),
            reason: "no addresses resolved".to_string(),
        })?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ListenerError::Bind {
            address: address.to_string(),
            source,
        })?;

    tracing::debug!(address = %addr, "TCP listener bound");
    Ok(BoundListener::Tcp(listener))
}

async fn bind_unix(path: &Path) -> Result<BoundListener, ListenerError> {
    let bind_error = |source| ListenerError::Bind {
        address: path.display().to_string(),
        source,
    };

    if path.as_os_str().is_empty() {
        return Err(ListenerError::Address {
            address: String::new(),
            reason: "empty socket path".to_string(),
        });
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(bind_error)?;
    }
    remove_socket(path).map_err(bind_error)?;

    let listener = UnixListener::bind(path).map_err(bind_error)?;
    tracing::debug!(path = %path.display(), "Unix listener bound");
    Ok(BoundListener::Unix {
        listener,
        path: path.to_path_buf(),
    })
}

/// Remove a socket file if present.
pub fn remove_socket(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
