//! Request stages wrapped around every RPC.
//!
//! # Data Flow
//! ```text
//! request
//!     → rwlock.rs  (shared hold on the BackendSet, held until the response)
//!     → authn.rs   (bearer token → Claims; only with auth)
//!     → authz.rs   (Claims + method → allow/deny; only with auth)
//!     → logging.rs (request id, outcome, duration)
//!     → service handler
//! ```
//!
//! # Design Decisions
//! - Each stage is an `axum::middleware` function with the
//!   (state, request, next) shape, composed once when the router is built
//! - Failures short-circuit as an `RpcStatus` response; later stages and the
//!   handler never run

pub mod authn;
pub mod authz;
pub mod logging;
pub mod rwlock;

pub use authn::authn;
pub use authz::authz;
pub use logging::logging;
pub use rwlock::rwlock;
