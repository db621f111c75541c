//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (port, directory, log level)
//!     → ServerConfig (validated, immutable)
//!     → shared by value with every subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CompressionConfig, FilesConfig, LineSplitting, ListenerConfig, ObservabilityConfig,
    ParserConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
