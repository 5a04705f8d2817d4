//! # qguard-query
//!
//! A small immutable, fluent SQL query builder. Each operation returns a new
//! [`Query`]; [`Query::get_sql`] renders the final text.
//!
//! ```ignore
//! use qguard_query::{Query, Table, count_star};
//!
//! let comment = Table::new("tabComment");
//! let sql = Query::default()
//!     .from_(&comment)
//!     .select([count_star()])?
//!     .where_(comment.field("seen").eq(0))
//!     .get_sql()?;
//! ```
//!
//! The builder quotes raw text but does not escape it. Literal-accepting
//! operations are meant to be reached through a sanitizing proxy; the
//! [`Reflect`](qguard_core::Reflect) impl in [`reflect`] publishes the method
//! table such proxies forward to.

pub mod query;
pub mod reflect;
pub mod render;
pub mod table;

pub use query::{Order, Query, QueryKind};
pub use render::SqlWriter;
pub use table::{Field, Operand, Table, count, count_star};
