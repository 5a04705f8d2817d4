//! Error types for the proxy crate.

use qguard_core::{BuilderError, EscapeError};
use thiserror::Error;

/// Errors that can occur while forwarding through a proxy.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProxyError {
    /// The wrapped object has no member with this name.
    #[error("'{type_name}' object has no attribute '{name}'")]
    UnknownMember {
        type_name: &'static str,
        name: String,
    },

    /// A data member was invoked as a method.
    #[error("'{type_name}' attribute '{name}' is not callable")]
    NotCallable {
        type_name: &'static str,
        name: String,
    },

    /// A proxy forwarded a builder-returning call without a redirect step.
    #[error("{proxy} does not implement redirect")]
    RedirectNotImplemented { proxy: &'static str },

    /// A call produced text where a proxy was expected, or the reverse.
    #[error("'{method}' returned {found}, expected {expected}")]
    UnexpectedOutcome {
        method: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The wrapped builder rejected the call.
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// The escaping function rejected a value.
    #[error(transparent)]
    Escape(#[from] EscapeError),
}
