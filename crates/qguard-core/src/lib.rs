//! # qguard-core
//!
//! Shared building blocks for qguard:
//!
//! - [`Value`]: literals carried by queries, raw or escaped
//! - [`Criterion`]: arena-backed conditional expression trees
//! - [`Reflect`] / [`Filterable`]: the contract a builder exposes to proxies
//! - [`Escape`] / [`SqlEscaper`]: escaping functions
//! - [`QguardConfig`]: YAML configuration

pub mod config;
pub mod error;
pub mod escape;
pub mod expr;
pub mod reflect;
pub mod value;

pub use config::{ConfigError, Dialect, EscapeConfig, QguardConfig, QueryConfig};
pub use error::{BuilderError, EscapeError};
pub use escape::{Escape, SqlEscaper};
pub use expr::{Comparator, Connective, Criterion, FieldRef, Node, NodeId, Term};
pub use reflect::{Arg, Args, Filterable, Member, Method, Reflect, Returned};
pub use value::Value;
