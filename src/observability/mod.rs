//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! SdkServer / gateway / use_* swaps
//!     → logging.rs (tracing subscriber: rpc and audit spans, plain or JSON)
//!     → metrics.rs (per-method counters and latency, backend swaps)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape of the optional exporter
//! ```
//!
//! # Design Decisions
//! - Every call gets an `rpc` span carrying the method and a request id
//! - Authorization decisions go to a separate `audit` span
//! - Recording without an installed exporter is a no-op

pub mod logging;
pub mod metrics;
