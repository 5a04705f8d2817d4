//! # qguard-proxy
//!
//! Transparent proxies for fluent query builders, and the sanitizing proxy
//! that guarantees no caller-supplied literal reaches rendered SQL unescaped.
//!
//! ## How It Works
//!
//! A [`Proxy`] resolves member names against its payload's method table
//! ([`Reflect`](qguard_core::Reflect)). Data members come back unchanged.
//! Callable members are wrapped in a [`PseudoMethod`]; invoking it returns
//! text as-is and passes any builder result through [`Proxy::redirect`].
//!
//! [`SanitizingProxy`] overrides `where` and `set`:
//!
//! ```ignore
//! let qb = Qb::default();
//! let note = qb.doctype("Note");
//! let sql = qb
//!     .from_(&note)
//!     .chain("select", Args::new().with(Arg::ident("*")))?
//!     .where_(note.field("title").eq("it's"))?
//!     .resolve("get_sql", Args::new())?;
//! // SELECT * FROM `tabNote` WHERE `tabNote`.`title` = 'it\'s'
//! ```
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | `where`   | Escape every literal leaf of the criterion, then delegate |
//! | `set`     | Escape the value, then delegate |
//! | any other | Forward; re-wrap builder results in a new `SanitizingProxy` |

pub mod error;
pub mod holder;
pub mod pseudo;
pub mod qb;
pub mod sanitize;

pub use error::ProxyError;
pub use holder::{Attr, Holder, Override, Proxy};
pub use pseudo::{Outcome, PseudoMethod};
pub use qb::Qb;
pub use sanitize::SanitizingProxy;
