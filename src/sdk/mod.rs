//! SDK listener instances.
//!
//! # Data Flow
//! ```text
//! accepted connection (tcp, tcp+tls or unix)
//!     → middleware (guard → authn → authz → logging)
//!     → registrar router (/openstorage.api.OpenStorage<Service>/<Method>)
//!     → services::<group> handler
//!     → backend from the shared hold
//! ```
//!
//! # Design Decisions
//! - One `SdkServer` type; the facade runs one per transport
//! - The backend set is the only mutable shared state and sits behind one
//!   `tokio::sync::RwLock` per instance
//! - Requests take a shared hold; only `use_*` takes the exclusive hold

pub mod backends;
pub mod extract;
pub mod middleware;
pub mod registrar;
pub mod server;
pub mod services;

pub use backends::{BackendLock, BackendSet, Backends};
pub use server::SdkServer;
