//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → CLI overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → BeaconConfig (validated, immutable)
//!     → handed to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no component reads global state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{finalize, load_config, parse_config, ConfigError};
pub use schema::{
    BeaconConfig, BeaconRouteConfig, HeaderDelimiter, LimitsConfig, ListenerConfig, LogConfig,
    ObservabilityConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
