//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default unix socket; `%s` is replaced by the driver name.
pub const DEFAULT_SOCKET: &str = "/var/run/%s.sock";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Listener, gateway and security settings.
    pub server: ServerConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener transport kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Unix,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Unix => "unix",
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for one listener instance and the gateway in front of it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport of the network listener.
    pub net: Transport,

    /// `host:port` for tcp, a socket path for unix.
    pub address: String,

    /// Gateway port; the gateway is not started when absent.
    pub rest_port: Option<u16>,

    /// Unix socket served alongside the network listener. May contain `%s`.
    pub socket: String,

    /// Volume driver to install at startup.
    pub driver_name: String,

    /// TLS for the tcp listener.
    pub tls: Option<TlsConfig>,

    /// Bearer-token authentication; disabled when absent.
    pub auth: Option<AuthConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            net: Transport::Tcp,
            address: "127.0.0.1:9100".to_string(),
            rest_port: None,
            socket: DEFAULT_SOCKET.to_string(),
            driver_name: String::new(),
            tls: None,
            auth: None,
        }
    }
}

/// TLS certificate and key (PEM).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TlsConfig {
    pub cert_file: PathBuf,
    pub key_file: PathBuf,
}

/// Token verification keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 shared secret.
    pub shared_secret: Option<String>,

    /// RS256 public key file.
    pub rsa_public_pem: Option<PathBuf>,

    /// ES256 public key file.
    pub ecdsa_public_pem: Option<PathBuf>,

    /// Required `iss` claim.
    pub issuer: Option<String>,
}

impl AuthConfig {
    pub fn has_key(&self) -> bool {
        self.shared_secret.as_deref().is_some_and(|s| !s.is_empty())
            || self.rsa_public_pem.is_some()
            || self.ecdsa_public_pem.is_some()
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
