//! TLS configuration and certificate loading.

use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0}")]
    MissingCert(PathBuf),

    #[error("Private key file not found: {0}")]
    MissingKey(PathBuf),

    #[error("Failed to load TLS material: {0}")]
    Load(#[from] std::io::Error),
}

/// Load TLS configuration from PEM certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, TlsError> {
    if !cert_path.exists() {
        return Err(TlsError::MissingCert(cert_path.to_path_buf()));
    }
    if !key_path.exists() {
        return Err(TlsError::MissingKey(key_path.to_path_buf()));
    }
    Ok(RustlsConfig::from_pem_file(cert_path, key_path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");

        let err = load_tls_config(&cert, &key).await.unwrap_err();
        assert!(matches!(err, TlsError::MissingCert(_)));

        std::fs::write(&cert, b"not a certificate").unwrap();
        let err = load_tls_config(&cert, &key).await.unwrap_err();
        assert!(matches!(err, TlsError::MissingKey(_)));
    }

    #[tokio::test]
    async fn garbage_pem_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, b"garbage").unwrap();
        std::fs::write(&key, b"garbage").unwrap();
        assert!(matches!(
            load_tls_config(&cert, &key).await,
            Err(TlsError::Load(_))
        ));
    }
}
