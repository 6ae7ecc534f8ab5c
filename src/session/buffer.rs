//! The scratch file the backend type-checks on every REPL turn.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempPath;

use crate::session::error::SessionError;

/// Recognized Agda source suffixes, in match order.
///
/// The first suffix that matches wins, not the longest one.
pub const AGDA_SUFFIXES: &[&str] = &[".lagda.tex", ".lagda.rst", ".lagda.md", ".lagda", ".agda"];

/// Module name for a file name: `Foo.lagda.md` → `Foo`.
///
/// Names without a recognized suffix are returned unchanged.
pub fn module_name_from_filename(name: &str) -> &str {
    AGDA_SUFFIXES
        .iter()
        .find_map(|suffix| name.strip_suffix(suffix))
        .unwrap_or(name)
}

/// True when `name` ends in one of [`AGDA_SUFFIXES`].
pub fn has_agda_suffix(name: &str) -> bool {
    AGDA_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Header line plus chronologically accumulated fragments, mirrored to a
/// temporary `.agda` file.
///
/// Every mutation is written through before it is committed in memory, so
/// a failed write leaves both copies at their previous state.
pub struct SessionBuffer {
    header: String,
    body: String,
    path: TempPath,
}

impl SessionBuffer {
    /// Create a fresh scratch file in `dir` and write the header to it.
    pub fn create_in(dir: &Path) -> Result<Self, SessionError> {
        let file = tempfile::Builder::new()
            .prefix("refl")
            .suffix(".agda")
            .rand_bytes(8)
            .tempfile_in(dir)
            .map_err(|source| SessionError::CreateScratch {
                dir: dir.to_path_buf(),
                source,
            })?;
        let path = file.into_temp_path();

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let header = format!("module {} where", module_name_from_filename(&file_name));

        let buffer = Self {
            header,
            body: String::new(),
            path,
        };
        buffer.write(&buffer.body)?;
        tracing::debug!(path = %buffer.path().display(), "created scratch file");
        Ok(buffer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `module <name> where`
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Everything after the header.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Exact file contents.
    pub fn contents(&self) -> String {
        render(&self.header, &self.body)
    }

    /// Append `text` followed by a blank line.
    pub fn append(&mut self, text: &str) -> Result<(), SessionError> {
        let mut body = self.body.clone();
        body.push_str(text);
        body.push_str("\n\n");
        self.write(&body)?;
        self.body = body;
        Ok(())
    }

    /// Drop every fragment, keeping only the header.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.write("")?;
        self.body.clear();
        tracing::debug!(path = %self.path().display(), "scratch file reset");
        Ok(())
    }

    /// Import the prelude module living at `prelude`.
    ///
    /// Returns the absolute directory of the prelude, which the backend
    /// needs as an include path.
    pub fn with_prelude(&mut self, prelude: &Path) -> Result<PathBuf, SessionError> {
        let file_name = prelude
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.append(&format!("import {}", module_name_from_filename(&file_name)))?;

        let dir = match prelude.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::path::absolute(dir).map_err(|source| SessionError::Prelude {
            path: prelude.to_path_buf(),
            source,
        })
    }

    /// Delete the scratch file.
    pub fn close(self) -> Result<(), SessionError> {
        let path = self.path.to_path_buf();
        self.path
            .close()
            .map_err(|source| SessionError::WriteScratch { path, source })
    }

    fn write(&self, body: &str) -> Result<(), SessionError> {
        fs::write(&self.path, render(&self.header, body)).map_err(|source| {
            SessionError::WriteScratch {
                path: self.path.to_path_buf(),
                source,
            }
        })
    }
}

fn render(header: &str, body: &str) -> String {
    format!("{header}\n\n{body}")
}
