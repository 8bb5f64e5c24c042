//! Layered configuration for widgets-rs
//!
//! Sources, lowest priority first:
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (never committed)
//! 4. `WIDGETS_*` environment variables (`__` separates nested keys)
//!
//! Command-line flags are applied on top by [`crate::cli::config_merger`].

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, ClientConfig, DatabaseConfig, LoggerSettings, ServerConfig, Settings,
    StorageBackend,
};
