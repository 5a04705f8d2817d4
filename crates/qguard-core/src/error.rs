//! Error types shared by builders and escapers.

use thiserror::Error;

/// Errors raised by an escaping function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EscapeError {
    /// The dialect cannot represent a NUL byte inside a string literal.
    #[error("string literal cannot contain NUL (0x00) characters")]
    NulByte,

    /// NaN and infinities have no SQL literal form.
    #[error("cannot escape non-finite float {0}")]
    NonFinite(f64),

    /// The escaper does not handle this kind of value.
    #[error("cannot escape {kind} value")]
    Unsupported { kind: &'static str },
}

/// Errors raised by a query builder while applying a call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuilderError {
    /// A positional argument was not supplied.
    #[error("missing argument {position}: expected {expected}")]
    MissingArgument {
        position: usize,
        expected: &'static str,
    },

    /// A positional argument had the wrong shape.
    #[error("argument {position}: expected {expected}, found {found}")]
    ArgumentType {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// More arguments were supplied than the method accepts.
    #[error("too many arguments: expected {expected}, got {got}")]
    TooManyArguments { expected: usize, got: usize },

    /// The operation does not apply to the current kind of query.
    #[error("{operation} is not valid on a {kind} query")]
    InvalidOperation {
        operation: &'static str,
        kind: &'static str,
    },

    /// The query cannot be rendered yet.
    #[error("incomplete query: {0}")]
    Incomplete(String),
}
