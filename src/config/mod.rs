//! Typed configuration: `[backend]`, `[repl]`, `[logging]` tables of
//! `config.toml`.
//!
//! The backend table is where an external resolver (package manager,
//! version switcher) hands over the executable and include paths.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{BackendConfig, Config, LoggingConfig, ReplConfig};
