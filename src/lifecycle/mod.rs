//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     SdkServer::stop / Gateway::stop → trigger
//!         → serve loop stops accepting → in-flight calls drain → task exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main → Server::stop
//! ```
//!
//! # Design Decisions
//! - One Shutdown per running listener, created by start() and dropped by stop()
//! - Draining is bounded; a serve task still running after the deadline is aborted

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownSignal};
