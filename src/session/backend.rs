//! Backend process invocation.
//!
//! ```text
//! <agda> --no-main --compile [--include-path <dir>]... <scratch-file>
//! ```
//!
//! Every invocation is a fresh, blocking run over the current file; there
//! is no long-lived backend process and no timeout.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};

use thiserror::Error;

use crate::protocol::Iotcm;

/// Flags passed on every REPL check.
pub const COMPILE_FLAGS: [&str; 2] = ["--no-main", "--compile"];

/// Flag that puts the backend into line-oriented interaction mode.
pub const INTERACTION_FLAG: &str = "--interaction";

/// Errors from running the backend. None of them end a session.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend executable '{executable}' not found: {source}")]
    NotFound {
        executable: PathBuf,
        #[source]
        source: which::Error,
    },

    #[error("Failed to start '{executable}': {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to send commands to '{executable}': {source}")]
    Pipe {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{executable}' failed on '{file}' ({status})")]
    Failed {
        executable: PathBuf,
        file: PathBuf,
        status: ExitStatus,
    },
}

/// Everything needed to start the backend: executable, include
/// directories, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendInvocation {
    executable: PathBuf,
    include_paths: Vec<PathBuf>,
    working_dir: PathBuf,
}

impl BackendInvocation {
    pub fn new(executable: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            include_paths: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    /// Add include directories, skipping ones already registered.
    pub fn with_include_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            self.add_include_path(path);
        }
        self
    }

    /// Register one more include directory.
    pub fn add_include_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.include_paths.contains(&path) {
            self.include_paths.push(path);
        }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn include_paths(&self) -> &[PathBuf] {
        &self.include_paths
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Arguments of a compile check of `file`.
    pub fn compile_args(&self, file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = COMPILE_FLAGS.iter().map(OsString::from).collect();
        args.extend(self.include_args());
        args.push(file.as_os_str().to_owned());
        args
    }

    /// Arguments of an interaction-mode run.
    pub fn interaction_args(&self) -> Vec<OsString> {
        let mut args = vec![OsString::from(INTERACTION_FLAG)];
        args.extend(self.include_args());
        args
    }

    /// Absolute path of the executable, searched on `PATH` when relative.
    pub fn resolve_executable(&self) -> Result<PathBuf, BackendError> {
        which::which(&self.executable).map_err(|source| BackendError::NotFound {
            executable: self.executable.clone(),
            source,
        })
    }

    /// Type-check and compile `file`, inheriting the terminal.
    pub fn compile(&self, file: &Path) -> Result<(), BackendError> {
        let executable = self.resolve_executable()?;
        let args = self.compile_args(file);
        tracing::debug!(executable = %executable.display(), ?args, "invoking backend");

        let status = std::process::Command::new(&executable)
            .args(&args)
            .current_dir(&self.working_dir)
            .status()
            .map_err(|source| BackendError::Spawn {
                executable: executable.clone(),
                source,
            })?;

        tracing::debug!(%status, "backend finished");
        if status.success() {
            Ok(())
        } else {
            Err(BackendError::Failed {
                executable,
                file: file.to_path_buf(),
                status,
            })
        }
    }

    /// Feed `commands` to the backend in interaction mode, one per line,
    /// and pass its output through untouched.
    pub fn interact(&self, commands: &[Iotcm]) -> Result<ExitStatus, BackendError> {
        let executable = self.resolve_executable()?;
        let mut child = std::process::Command::new(&executable)
            .args(self.interaction_args())
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|source| BackendError::Spawn {
                executable: executable.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            for command in commands {
                tracing::trace!(%command, "sending");
                if let Err(source) = writeln!(stdin, "{command}") {
                    drop(stdin);
                    reap(&mut child);
                    return Err(BackendError::Pipe { executable, source });
                }
            }
        }

        child.wait().map_err(|source| BackendError::Pipe {
            executable,
            source,
        })
    }

    fn include_args(&self) -> impl Iterator<Item = OsString> + '_ {
        self.include_paths.iter().flat_map(|path| {
            [
                OsString::from("--include-path"),
                path.as_os_str().to_owned(),
            ]
        })
    }
}

/// Kill and wait for a child whose input could not be delivered.
fn reap(child: &mut Child) {
    if let Err(err) = child.kill() {
        tracing::debug!(error = %err, "backend already exited");
    }
    match child.wait() {
        Ok(status) => tracing::debug!(%status, "backend reaped"),
        Err(err) => tracing::warn!(error = %err, "failed to reap backend"),
    }
}

/// Seam between the REPL and the real backend process.
pub trait Backend {
    /// Check `file` with `invocation`.
    fn check(&mut self, invocation: &BackendInvocation, file: &Path) -> Result<(), BackendError>;
}

/// Runs the backend as a child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessBackend;

impl Backend for ProcessBackend {
    fn check(&mut self, invocation: &BackendInvocation, file: &Path) -> Result<(), BackendError> {
        invocation.compile(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn compile_args_without_includes() {
        let invocation = BackendInvocation::new("agda", "/tmp");
        assert_eq!(
            strings(invocation.compile_args(Path::new("/tmp/reflA.agda"))),
            vec!["--no-main", "--compile", "/tmp/reflA.agda"]
        );
    }

    #[test]
    fn include_paths_precede_file() {
        let invocation =
            BackendInvocation::new("agda", "/tmp").with_include_paths(["/lib/std", "/home/me/prelude"]);
        assert_eq!(
            strings(invocation.compile_args(Path::new("s.agda"))),
            vec![
                "--no-main",
                "--compile",
                "--include-path",
                "/lib/std",
                "--include-path",
                "/home/me/prelude",
                "s.agda",
            ]
        );
    }

    #[test]
    fn include_paths_are_deduplicated() {
        let mut invocation = BackendInvocation::new("agda", "/tmp").with_include_paths(["/lib"]);
        invocation.add_include_path("/lib");
        assert_eq!(invocation.include_paths(), &[PathBuf::from("/lib")]);
    }

    #[test]
    fn interaction_args_carry_includes() {
        let invocation = BackendInvocation::new("agda", "/tmp").with_include_paths(["/lib"]);
        assert_eq!(
            strings(invocation.interaction_args()),
            vec!["--interaction", "--include-path", "/lib"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn unread_input_is_a_pipe_error() {
        // `true` exits without reading, so the pipe fills and then breaks.
        let invocation = BackendInvocation::new("true", std::env::temp_dir());
        let line = Iotcm::new(
            "a.agda",
            crate::protocol::Command::InferToplevel {
                rewrite: crate::protocol::RewriteMode::Simplified,
                expr: "x".repeat(1024),
            },
        )
        .unwrap();
        let commands = vec![line; 512];

        let err = invocation.interact(&commands).unwrap_err();
        assert!(matches!(err, BackendError::Pipe { .. }));
    }

    #[test]
    fn missing_executable_is_reported() {
        let invocation = BackendInvocation::new("refl-no-such-backend-xyz", "/tmp");
        let err = invocation.compile(Path::new("x.agda")).unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
        assert!(err.to_string().contains("refl-no-such-backend-xyz"));
    }
}
