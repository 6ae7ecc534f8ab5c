use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::session::History;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub repl: ReplConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which backend to run and where it finds libraries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Executable name or path (default: "agda").
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    /// Extra `--include-path` directories.
    #[serde(default)]
    pub include_paths: Vec<PathBuf>,
    /// Directory the backend runs in (default: the session's temp directory).
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

/// REPL behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Agda module imported at the start of every session.
    #[serde(default)]
    pub prelude: Option<PathBuf>,
    /// History file (default: `~/.refl_history`).
    #[serde(default)]
    pub history: Option<PathBuf>,
}

/// Log filter used when `RUST_LOG` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_executable() -> PathBuf {
    PathBuf::from("agda")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            include_paths: Vec::new(),
            working_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Configured history file, or the default dotfile.
    pub fn history_path(&self) -> PathBuf {
        self.repl
            .history
            .clone()
            .unwrap_or_else(History::default_path)
    }
}
