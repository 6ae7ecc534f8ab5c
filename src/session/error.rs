use std::path::PathBuf;

use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures that end a REPL session.
///
/// Backend failures are not here: a failed check is reported and the
/// session goes on with its buffer intact.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to create scratch file in '{dir}': {source}")]
    CreateScratch {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write scratch file '{path}': {source}")]
    WriteScratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve prelude directory for '{path}': {source}")]
    Prelude {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access history file '{path}': {source}")]
    History {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line editor failed: {0}")]
    Readline(#[from] ReadlineError),
}
