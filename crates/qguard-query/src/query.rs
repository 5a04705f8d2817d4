//! The immutable fluent query builder.
//!
//! Every operation returns a new [`Query`]; the receiver is never modified.

use std::fmt;
use std::str::FromStr;

use qguard_core::{BuilderError, Criterion, Dialect, FieldRef, Filterable, Term, Value};

use crate::render::SqlWriter;

/// Statement kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    Update,
    Delete,
}

impl QueryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryKind::Select => "select",
            QueryKind::Update => "update",
            QueryKind::Delete => "delete",
        }
    }
}

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

impl FromStr for Order {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            _ => Err(()),
        }
    }
}

/// A query under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    dialect: Dialect,
    kind: QueryKind,
    tables: Vec<String>,
    terms: Vec<Term>,
    distinct: bool,
    wheres: Option<Criterion>,
    assignments: Vec<(String, Value)>,
    order_by: Vec<(FieldRef, Order)>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for Query {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl Query {
    /// An empty select query.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            kind: QueryKind::Select,
            tables: Vec::new(),
            terms: Vec::new(),
            distinct: false,
            wheres: None,
            assignments: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    /// The accumulated filter tree.
    pub fn criterion(&self) -> Option<&Criterion> {
        self.wheres.as_ref()
    }

    pub fn assignments(&self) -> &[(String, Value)] {
        &self.assignments
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    fn ensure(&self, operation: &'static str, kind: QueryKind) -> Result<(), BuilderError> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(BuilderError::InvalidOperation {
                operation,
                kind: self.kind.as_str(),
            })
        }
    }

    /// Add a table to the `FROM` list.
    pub fn from_(&self, table: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.tables.push(table.into());
        next
    }

    /// Turn an empty query into an `UPDATE` of `table`.
    pub fn update(&self, table: impl Into<String>) -> Result<Self, BuilderError> {
        if !self.tables.is_empty() || !self.terms.is_empty() {
            return Err(BuilderError::InvalidOperation {
                operation: "update",
                kind: self.kind.as_str(),
            });
        }
        let mut next = self.clone();
        next.kind = QueryKind::Update;
        next.tables.push(table.into());
        Ok(next)
    }

    /// Turn a select query without a select list into a `DELETE`.
    pub fn delete(&self) -> Result<Self, BuilderError> {
        self.ensure("delete", QueryKind::Select)?;
        if !self.terms.is_empty() {
            return Err(BuilderError::InvalidOperation {
                operation: "delete",
                kind: self.kind.as_str(),
            });
        }
        let mut next = self.clone();
        next.kind = QueryKind::Delete;
        Ok(next)
    }

    pub fn select<I, T>(&self, terms: I) -> Result<Self, BuilderError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        self.ensure("select", QueryKind::Select)?;
        let mut next = self.clone();
        next.terms.extend(terms.into_iter().map(Into::into));
        Ok(next)
    }

    pub fn distinct(&self) -> Self {
        let mut next = self.clone();
        next.distinct = true;
        next
    }

    /// AND `criterion` into the filter tree.
    pub fn where_(&self, criterion: Criterion) -> Self {
        let mut next = self.clone();
        next.wheres = Some(match next.wheres.take() {
            Some(existing) => existing & criterion,
            None => criterion,
        });
        next
    }

    /// Add `field = value` to an update.
    pub fn set(&self, field: impl Into<String>, value: impl Into<Value>) -> Result<Self, BuilderError> {
        self.ensure("set", QueryKind::Update)?;
        let mut next = self.clone();
        next.assignments.push((field.into(), value.into()));
        Ok(next)
    }

    pub fn orderby(&self, field: FieldRef, order: Order) -> Self {
        let mut next = self.clone();
        next.order_by.push((field, order));
        next
    }

    pub fn limit(&self, limit: u64) -> Self {
        let mut next = self.clone();
        next.limit = Some(limit);
        next
    }

    pub fn offset(&self, offset: u64) -> Self {
        let mut next = self.clone();
        next.offset = Some(offset);
        next
    }

    /// Render the query as SQL text.
    pub fn get_sql(&self) -> Result<String, BuilderError> {
        tracing::trace!(kind = self.kind.as_str(), dialect = %self.dialect, "rendering query");
        let w = SqlWriter::new(self.dialect);
        if self.tables.is_empty() {
            return Err(BuilderError::Incomplete("no table".to_string()));
        }
        let tables = self
            .tables
            .iter()
            .map(|t| w.ident(t))
            .collect::<Vec<_>>()
            .join(", ");

        let mut sql = match self.kind {
            QueryKind::Select => {
                if self.terms.is_empty() {
                    return Err(BuilderError::Incomplete("nothing selected".to_string()));
                }
                let terms = self
                    .terms
                    .iter()
                    .map(|t| w.term(t))
                    .collect::<Vec<_>>()
                    .join(", ");
                let distinct = if self.distinct { "DISTINCT " } else { "" };
                format!("SELECT {}{} FROM {}", distinct, terms, tables)
            }
            QueryKind::Update => {
                if self.assignments.is_empty() {
                    return Err(BuilderError::Incomplete("no assignments".to_string()));
                }
                let sets = self
                    .assignments
                    .iter()
                    .map(|(field, value)| format!("{} = {}", w.ident(field), w.value(value)))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("UPDATE {} SET {}", tables, sets)
            }
            QueryKind::Delete => format!("DELETE FROM {}", tables),
        };

        if let Some(criterion) = &self.wheres {
            sql.push_str(" WHERE ");
            sql.push_str(&w.criterion(criterion));
        }
        if !self.order_by.is_empty() {
            let order = self
                .order_by
                .iter()
                .map(|(field, order)| format!("{} {}", w.field(field), order.sql()))
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(" ORDER BY ");
            sql.push_str(&order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
        Ok(sql)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get_sql() {
            Ok(sql) => f.write_str(&sql),
            Err(_) => write!(f, "<incomplete {} query>", self.kind.as_str()),
        }
    }
}

impl Filterable for Query {
    fn filter(&self, criterion: Criterion) -> Result<Self, BuilderError> {
        Ok(self.where_(criterion))
    }

    fn assign(&self, field: &str, value: Value) -> Result<Self, BuilderError> {
        self.set(field, value)
    }
}
