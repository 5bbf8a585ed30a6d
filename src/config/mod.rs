//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → Config (validated, immutable)
//!     → ServerConfig handed to the facade
//!
//! On reload (--watch):
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → main swaps the volume driver if driver_name changed
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the driver name is hot-reloaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{AuthConfig, Config, ObservabilityConfig, ServerConfig, TlsConfig, Transport};
pub use validation::ValidationError;
