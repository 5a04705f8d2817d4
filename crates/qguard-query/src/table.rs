//! Tables, columns and the comparison operators that build criteria.

use qguard_core::{Comparator, Criterion, FieldRef, QueryConfig, Term, Value};

/// A table referenced by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    name: String,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The table backing a document type (`Comment` -> `tabComment`).
    pub fn doctype(doctype: &str, config: &QueryConfig) -> Self {
        Self::new(config.doctype_table(doctype))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A column of this table.
    pub fn field(&self, name: impl Into<String>) -> Field {
        Field::of(self.name.clone(), name)
    }

    pub fn star(&self) -> Term {
        Term::Star
    }
}

impl From<&Table> for String {
    fn from(table: &Table) -> Self {
        table.name.clone()
    }
}

/// The right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Field(FieldRef),
}

impl Operand {
    fn into_criterion(self) -> Criterion {
        match self {
            Operand::Value(value) => Criterion::literal(value),
            Operand::Field(field) => Criterion::field(field),
        }
    }
}

macro_rules! operand_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Value(value.into())
                }
            }
        )*
    };
}

operand_from_value!(Value, &str, String, bool, i32, i64, u32, f64);

impl From<Field> for Operand {
    fn from(field: Field) -> Self {
        Operand::Field(field.inner)
    }
}

impl From<&Field> for Operand {
    fn from(field: &Field) -> Self {
        Operand::Field(field.inner.clone())
    }
}

/// A column, possibly qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    inner: FieldRef,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: FieldRef::new(name),
        }
    }

    pub fn of(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            inner: FieldRef::qualified(table, name),
        }
    }

    pub fn field_ref(&self) -> &FieldRef {
        &self.inner
    }

    fn compare(&self, op: Comparator, rhs: impl Into<Operand>) -> Criterion {
        Criterion::compare(
            op,
            Criterion::field(self.inner.clone()),
            rhs.into().into_criterion(),
        )
    }

    pub fn eq(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Eq, rhs)
    }

    pub fn ne(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Ne, rhs)
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Lt, rhs)
    }

    pub fn le(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Le, rhs)
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Gt, rhs)
    }

    pub fn ge(&self, rhs: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Ge, rhs)
    }

    pub fn like(&self, pattern: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::Like, pattern)
    }

    pub fn not_like(&self, pattern: impl Into<Operand>) -> Criterion {
        self.compare(Comparator::NotLike, pattern)
    }

    pub fn isin<I, V>(&self, values: I) -> Criterion
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Criterion::compare(
            Comparator::In,
            Criterion::field(self.inner.clone()),
            Criterion::list(values),
        )
    }

    pub fn notin<I, V>(&self, values: I) -> Criterion
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Criterion::compare(
            Comparator::NotIn,
            Criterion::field(self.inner.clone()),
            Criterion::list(values),
        )
    }

    pub fn isnull(&self) -> Criterion {
        Criterion::null_check(self.inner.clone(), false)
    }

    pub fn isnotnull(&self) -> Criterion {
        Criterion::null_check(self.inner.clone(), true)
    }

    pub fn as_(&self, alias: impl Into<String>) -> Term {
        Term::Field(self.inner.clone()).as_(alias)
    }
}

impl From<Field> for Term {
    fn from(field: Field) -> Self {
        Term::Field(field.inner)
    }
}

impl From<&Field> for Term {
    fn from(field: &Field) -> Self {
        Term::Field(field.inner.clone())
    }
}

/// `COUNT(*)`.
pub fn count_star() -> Term {
    Term::Count(None)
}

/// `COUNT(column)`.
pub fn count(field: &Field) -> Term {
    Term::Count(Some(field.inner.clone()))
}
