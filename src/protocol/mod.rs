//! Encoder for the backend's textual interaction protocol.
//!
//! ```text
//! Command + file → validate → Iotcm → encode → "IOTCM \"f\" Mode Indirect (Cmd_x ...)"
//! ```
//!
//! Validation happens once, when the [`Iotcm`] envelope is built; encoding
//! is pure and cannot fail.

mod command;
mod enums;
mod error;
mod range;

pub use command::{Command, Goal, IoMode, Iotcm};
pub use enums::{
    all_spellings, encode_bool, CompileBackend, ComputeMode, RewriteMode, TokenHighlighting,
    UseForce,
};
pub use error::{ConstructionError, EncodingError};
pub use range::{Interval, Position, Range, NO_RANGE};
