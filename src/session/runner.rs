//! The REPL loop.
//!
//! ```text
//! Idle → read line → classify ─┬─ Meta      → echo
//!                              ├─ Shell     → sh -c
//!                              ├─ Clear     → clear terminal
//!                              ├─ Reset     → buffer.reset()
//!                              └─ Source    → buffer.append() → backend check
//! EOF → Exiting
//! ```
//!
//! Single-threaded: each backend check blocks until the process exits.

use std::io;
use std::path::Path;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tempfile::TempDir;

use crate::cli::parse_meta_command;
use crate::config::Config;
use crate::protocol::Command;
use crate::session::backend::{Backend, BackendInvocation, ProcessBackend};
use crate::session::buffer::SessionBuffer;
use crate::session::error::SessionError;
use crate::session::helper::ReplHelper;
use crate::session::history::History;
use crate::session::input::{classify, split_command_line, Input};

/// What one line of input did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Skipped,
    Echoed(String),
    Shell,
    Cleared,
    Reset,
    Checked { ok: bool },
}

/// Scratch buffer plus the parameters to check it with.
pub struct Session<B> {
    buffer: SessionBuffer,
    invocation: BackendInvocation,
    backend: B,
}

impl<B: Backend> Session<B> {
    /// Import `prelude` if given, then check the fresh buffer once.
    pub fn start(
        buffer: SessionBuffer,
        invocation: BackendInvocation,
        backend: B,
        prelude: Option<&Path>,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            buffer,
            invocation,
            backend,
        };

        if let Some(prelude) = prelude {
            let include = session.buffer.with_prelude(prelude)?;
            tracing::info!(prelude = %prelude.display(), include = %include.display(), "prelude registered");
            session.invocation.add_include_path(include);
        }

        session.check();
        Ok(session)
    }

    pub fn buffer(&self) -> &SessionBuffer {
        &self.buffer
    }

    pub fn invocation(&self) -> &BackendInvocation {
        &self.invocation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Handle one line of input.
    ///
    /// Only scratch-file I/O failures are returned; backend and shell
    /// failures are reported and the session continues.
    pub fn dispatch(&mut self, line: &str) -> Result<Step, SessionError> {
        match classify(line) {
            Input::Empty => Ok(Step::Skipped),
            Input::Meta(text) => {
                let echo = self.echo_meta(&text);
                println!("{echo}");
                Ok(Step::Echoed(echo))
            }
            Input::Shell(command) => {
                run_shell(&command);
                Ok(Step::Shell)
            }
            Input::Clear => {
                clear_screen();
                Ok(Step::Cleared)
            }
            Input::Reset => {
                self.buffer.reset()?;
                Ok(Step::Reset)
            }
            Input::Source(text) => {
                self.buffer.append(&text)?;
                let ok = self.check();
                Ok(Step::Checked { ok })
            }
        }
    }

    /// Remove the scratch file.
    pub fn close(self) -> Result<(), SessionError> {
        self.buffer.close()
    }

    /// Envelope for a recognized protocol command, the raw text otherwise.
    fn echo_meta(&self, text: &str) -> String {
        let file = self.buffer.path();
        match parse_meta_command(text, file) {
            Ok(iotcm) => iotcm.encode(),
            Err(err) => {
                let names_command = split_command_line(text)
                    .first()
                    .is_some_and(|word| Command::NAMES.contains(&word.as_str()));
                if names_command {
                    eprintln!("{} {err:#}", "error:".red().bold());
                }
                text.to_string()
            }
        }
    }

    fn check(&mut self) -> bool {
        match self.backend.check(&self.invocation, self.buffer.path()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "backend check failed");
                eprintln!("{} {err}", "error:".red().bold());
                false
            }
        }
    }
}

fn shell_command(command: &str) -> std::process::Command {
    let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
    let mut cmd = std::process::Command::new(shell);
    cmd.arg(flag).arg(command);
    cmd
}

fn run_shell(command: &str) {
    if command.is_empty() {
        return;
    }
    match shell_command(command).status() {
        Ok(status) if !status.success() => {
            tracing::debug!(command, %status, "shell command failed");
        }
        Ok(_) => {}
        Err(err) => {
            tracing::warn!(command, error = %err, "shell command did not start");
            eprintln!("{} {command}: {err}", "error:".red().bold());
        }
    }
}

fn clear_screen() {
    if let Err(err) = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0)) {
        tracing::warn!(error = %err, "failed to clear terminal");
    }
}

/// Interactive front end over a [`Session`] driving the real backend.
pub struct SessionRunner {
    session: Session<ProcessBackend>,
    history: History,
    editor: Editor<ReplHelper, DefaultHistory>,
    scratch_dir: TempDir,
}

impl SessionRunner {
    /// Create the scratch file, load history, and run the initial check.
    pub fn new(config: &Config) -> Result<Self, SessionError> {
        let scratch_dir = tempfile::Builder::new()
            .prefix("refl-session")
            .tempdir()
            .map_err(|source| SessionError::CreateScratch {
                dir: std::env::temp_dir(),
                source,
            })?;
        let buffer = SessionBuffer::create_in(scratch_dir.path())?;

        let working_dir = config
            .backend
            .working_dir
            .clone()
            .unwrap_or_else(|| scratch_dir.path().to_path_buf());
        let invocation = BackendInvocation::new(&config.backend.executable, working_dir)
            .with_include_paths(config.backend.include_paths.iter().cloned());

        let history = History::open(config.history_path())?;
        let mut editor: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
        editor.set_helper(Some(ReplHelper::new()));
        for entry in history.entries()? {
            editor.add_history_entry(entry)?;
        }

        print_banner();
        tracing::info!(
            scratch = %buffer.path().display(),
            executable = %invocation.executable().display(),
            "session started"
        );
        let session = Session::start(
            buffer,
            invocation,
            ProcessBackend,
            config.repl.prelude.as_deref(),
        )?;

        Ok(Self {
            session,
            history,
            editor,
            scratch_dir,
        })
    }

    /// Read and dispatch lines until EOF.
    pub fn run(mut self) -> Result<(), SessionError> {
        loop {
            let line = match self.editor.readline(&prompt()) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            };

            let entry = line.trim();
            if !entry.is_empty() {
                self.editor.add_history_entry(entry)?;
                self.history.append(entry)?;
            }

            self.session.dispatch(&line)?;
        }

        tracing::info!(dir = %self.scratch_dir.path().display(), "session closed");
        self.session.close()
    }
}

fn prompt() -> String {
    let dir = std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();
    format!("refl★ {dir} ⟹  ")
}

fn print_banner() {
    println!(
        "{} the Agda REPL. Type Agda code, `new` to start over, `!cmd` for the shell, Ctrl-D to quit.",
        "Refl ♠".magenta().bold()
    );
}
