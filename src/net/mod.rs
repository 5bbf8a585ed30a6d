//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig (net, address, tls)
//!     → listener.rs (bind tcp socket or unix socket file)
//!     → tls.rs (optional rustls config for tcp)
//!     → handed to the listener instance's serve loop
//! ```
//!
//! # Design Decisions
//! - Binding happens before the serve task is spawned so bind errors surface
//!   from `start()`
//! - TLS is optional and never applied to unix sockets

pub mod listener;
pub mod tls;
