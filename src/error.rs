//! Startup and lifecycle errors.

use crate::auth::AuthError;

/// Errors from building, starting or reconfiguring servers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{name}: unable to set up transport: {reason}")]
    Transport { name: String, reason: String },

    #[error("{0} is already running")]
    AlreadyRunning(String),

    #[error("Unable to get driver {0}")]
    Driver(String),
}

impl ServerError {
    pub(crate) fn transport(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::Transport {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(err: AuthError) -> Self {
        Self::Config(err.to_string())
    }
}
