//! JWT authenticator.
//!
//! Accepts HS256 tokens signed with a shared secret and RS256 / ES256 tokens
//! verified against PEM public keys. The token header selects the key.

use std::path::Path;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::{AuthError, Authenticator, Claims};
use crate::config::AuthConfig;

pub struct JwtAuthenticator {
    shared: Option<DecodingKey>,
    rsa: Option<DecodingKey>,
    ecdsa: Option<DecodingKey>,
    issuer: Option<String>,
}

impl JwtAuthenticator {
    /// HS256-only authenticator.
    pub fn with_secret(secret: impl AsRef<[u8]>) -> Self {
        Self {
            shared: Some(DecodingKey::from_secret(secret.as_ref())),
            rsa: None,
            ecdsa: None,
            issuer: None,
        }
    }

    /// Requires tokens to carry `iss == issuer`.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Builds the authenticator from configuration, reading PEM files.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let shared = config
            .shared_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| DecodingKey::from_secret(s.as_bytes()));
        let rsa = config
            .rsa_public_pem
            .as_deref()
            .map(|path| read_pem(path).and_then(|pem| {
                DecodingKey::from_rsa_pem(&pem).map_err(|e| pem_error(path, e))
            }))
            .transpose()?;
        let ecdsa = config
            .ecdsa_public_pem
            .as_deref()
            .map(|path| read_pem(path).and_then(|pem| {
                DecodingKey::from_ec_pem(&pem).map_err(|e| pem_error(path, e))
            }))
            .transpose()?;

        if shared.is_none() && rsa.is_none() && ecdsa.is_none() {
            return Err(AuthError::Config("no verification key configured".into()));
        }

        Ok(Self {
            shared,
            rsa,
            ecdsa,
            issuer: config.issuer.clone(),
        })
    }

    fn key_for(&self, algorithm: Algorithm) -> Option<&DecodingKey> {
        match algorithm {
            Algorithm::HS256 => self.shared.as_ref(),
            Algorithm::RS256 => self.rsa.as_ref(),
            Algorithm::ES256 => self.ecdsa.as_ref(),
            _ => None,
        }
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, AuthError> {
    std::fs::read(path)
        .map_err(|e| AuthError::Config(format!("cannot read {}: {e}", path.display())))
}

fn pem_error(path: &Path, err: jsonwebtoken::errors::Error) -> AuthError {
    AuthError::Config(format!("invalid key in {}: {err}", path.display()))
}

impl Authenticator for JwtAuthenticator {
    fn authenticate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let key = self.key_for(header.alg).ok_or_else(|| {
            AuthError::InvalidToken(format!("unsupported algorithm {:?}", header.alg))
        })?;

        let mut validation = Validation::new(header.alg);
        validation.validate_aud = false;
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl std::fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("hs256", &self.shared.is_some())
            .field("rs256", &self.rsa.is_some())
            .field("es256", &self.ecdsa.is_some())
            .field("issuer", &self.issuer)
            .finish()
    }
}
