//! Refl: an Agda REPL and an encoder for Agda's interaction protocol.
//!
//! - [`protocol`] turns typed commands into `IOTCM` lines.
//! - [`session`] runs the REPL over a scratch file.
//! - [`config`], [`logging`] and [`cli`] are the ambient layers.

pub mod cli;
pub mod config;
pub mod logging;
pub mod protocol;
pub mod session;
