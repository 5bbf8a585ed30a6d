//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check transport/TLS compatibility
//! - Require at least one verification key when auth is enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Config → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::{Config, Transport};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let server = &config.server;

    if server.address.trim().is_empty() {
        errors.push(ValidationError::new("server.address", "must not be empty"));
    }
    if server.socket.trim().is_empty() {
        errors.push(ValidationError::new("server.socket", "must not be empty"));
    }
    if server.rest_port == Some(0) {
        errors.push(ValidationError::new("server.rest_port", "must be non-zero"));
    }

    if let Some(tls) = &server.tls {
        if server.net == Transport::Unix {
            errors.push(ValidationError::new("server.tls", "only supported with tcp"));
        }
        if tls.cert_file.as_os_str().is_empty() {
            errors.push(ValidationError::new("server.tls.cert_file", "must not be empty"));
        }
        if tls.key_file.as_os_str().is_empty() {
            errors.push(ValidationError::new("server.tls.key_file", "must not be empty"));
        }
    }

    if let Some(auth) = &server.auth {
        if !auth.has_key() {
            errors.push(ValidationError::new(
                "server.auth",
                "requires shared_secret, rsa_public_pem or ecdsa_public_pem",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, TlsConfig};

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn tls_on_unix_is_rejected() {
        let mut config = Config::default();
        config.server.net = Transport::Unix;
        config.server.tls = Some(TlsConfig {
            cert_file: "cert.pem".into(),
            key_file: "key.pem".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::new("server.tls", "only supported with tcp")]);
    }

    #[test]
    fn auth_without_key_is_rejected() {
        let mut config = Config::default();
        config.server.auth = Some(AuthConfig::default());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "server.auth");
    }
}
