//! Storage SDK server.
//!
//! Serves the storage SDK over a network listener and a unix-domain socket,
//! with an optional HTTP/JSON gateway relaying to the socket.
//!
//! # Architecture Overview
//!
//! ```text
//!     tcp / tls client          unix client            REST client
//!            │                       │                      │
//!            ▼                       ▼                      ▼
//!     ┌─────────────┐         ┌─────────────┐         ┌──────────┐
//!     │ SdkServer   │         │ SdkServer   │◀────────│ gateway  │
//!     │ (SDK-tcp)   │         │ (SDK-unix)  │  relay  └──────────┘
//!     └──────┬──────┘         └──────┬──────┘
//!            │ rwlock → authn → authz → logging
//!            ▼                       ▼
//!     ┌──────────────────────────────────────┐
//!     │ registrar: 12 operation groups       │
//!     └──────────────────┬───────────────────┘
//!                        ▼
//!     ┌──────────────────────────────────────┐
//!     │ VolumeDriver / Cluster / AlertStore   │
//!     └──────────────────────────────────────┘
//! ```

pub mod api;
pub mod auth;
pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod sdk;
pub mod server;

pub use client::SdkClient;
pub use config::{Config, ServerConfig};
pub use error::ServerError;
pub use lifecycle::Shutdown;
pub use server::Server;
