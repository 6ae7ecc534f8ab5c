//! REPL session: scratch buffer, input dispatch, backend invocation.
//!
//! ```text
//! line → classify → Session::dispatch ─┬→ SessionBuffer (append / reset)
//!                                      └→ Backend::check (blocking)
//! ```

mod backend;
mod buffer;
mod error;
mod helper;
mod history;
mod input;
mod runner;

pub use backend::{
    Backend, BackendError, BackendInvocation, ProcessBackend, COMPILE_FLAGS, INTERACTION_FLAG,
};
pub use buffer::{has_agda_suffix, module_name_from_filename, SessionBuffer, AGDA_SUFFIXES};
pub use error::SessionError;
pub use helper::ReplHelper;
pub use history::{History, HISTORY_FILENAME};
pub use input::{classify, split_command_line, Input};
pub use runner::{Session, SessionRunner, Step};
