//! Plain-text input history, one entry per line.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::session::error::SessionError;

/// File name of the history file inside the home directory.
pub const HISTORY_FILENAME: &str = ".refl_history";

/// Append-only history file shared by every session.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    /// `~/.refl_history`, or `./.refl_history` without a home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(HISTORY_FILENAME)
    }

    /// Open the history at `path`, creating an empty file if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let history = Self { path: path.into() };
        history.append_handle()?;
        Ok(history)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored entries, oldest first. Blank lines are skipped.
    pub fn entries(&self) -> Result<Vec<String>, SessionError> {
        let content = fs::read_to_string(&self.path).map_err(|source| self.error(source))?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect())
    }

    /// Record one entry.
    pub fn append(&self, entry: &str) -> Result<(), SessionError> {
        let mut file = self.append_handle()?;
        writeln!(file, "{entry}").map_err(|source| self.error(source))
    }

    fn append_handle(&self) -> Result<fs::File, SessionError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.error(source))
    }

    fn error(&self, source: std::io::Error) -> SessionError {
        SessionError::History {
            path: self.path.clone(),
            source,
        }
    }
}
