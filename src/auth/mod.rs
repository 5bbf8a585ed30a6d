//! Bearer-token authentication and rule-based authorization.
//!
//! # Responsibilities
//! - Turn a bearer token into [`Claims`] ([`Authenticator`])
//! - Decide whether a set of [`Rule`]s grants a method ([`rules`])
//!
//! Nothing here touches HTTP; the request stages in `sdk::middleware` wrap
//! these functions.

pub mod claims;
pub mod jwt;
pub mod rules;

pub use claims::{Claims, Rule};
pub use jwt::JwtAuthenticator;

/// Authentication and authorization failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Access denied, token is missing")]
    MissingToken,

    #[error("Access denied, malformed authorization header")]
    MalformedHeader,

    #[error("Access denied, token is invalid: {0}")]
    InvalidToken(String),

    #[error("Access denied, no roles or rules set")]
    NoRolesOrRules,

    #[error("Access denied, unknown role: {0}")]
    UnknownRole(String),

    #[error("Authentication misconfigured: {0}")]
    Config(String),
}

/// Validates a raw bearer token.
pub trait Authenticator: Send + Sync {
    fn authenticate_token(&self, token: &str) -> Result<Claims, AuthError>;
}
