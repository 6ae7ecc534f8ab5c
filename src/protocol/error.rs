use thiserror::Error;

/// A [`Command`](crate::protocol::Command) was paired with arguments the
/// backend cannot act on. Raised when the envelope is built, before any
/// encoding or I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("IOTCM envelope needs a file path")]
    EmptyFile,

    #[error("{command}: needs a range (--where) or an expression (--expr)")]
    MissingTarget { command: &'static str },

    #[error("{command}: expression must not be empty")]
    EmptyExpression { command: &'static str },
}

/// Malformed textual input for a protocol value, rejected at the boundary
/// so that encoding itself stays total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("unknown {kind} '{value}', expected one of: {expected}")]
    UnknownSpelling {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("malformed range '{input}': {reason}")]
    MalformedRange { input: String, reason: String },
}
