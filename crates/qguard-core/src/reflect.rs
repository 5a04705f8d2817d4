//! Reflection contract between proxies and the objects they wrap.
//!
//! A wrapped object publishes its interface as a method table: [`Reflect::member`]
//! resolves a name to either a data member or a callable [`Method`]. Calls
//! receive positional [`Args`] and return a tagged [`Returned`] so callers can
//! tell a rendered string from the next builder in a chain without inspecting
//! types at runtime.

use std::collections::VecDeque;
use std::fmt;

use crate::error::BuilderError;
use crate::expr::{Criterion, FieldRef, Term};
use crate::value::Value;

/// Result of calling a method on a reflected object.
#[derive(Debug, Clone, PartialEq)]
pub enum Returned<P> {
    /// A final textual value, such as rendered SQL.
    Text(String),
    /// The next builder in a fluent chain.
    Builder(P),
}

/// A callable member: receives the object and its arguments.
pub type Method<P> = fn(&P, Args) -> Result<Returned<P>, BuilderError>;

/// A named member of a reflected object.
pub enum Member<P> {
    /// A data member, returned by value.
    Field(Value),
    Method(Method<P>),
}

impl<P> Member<P> {
    pub fn is_callable(&self) -> bool {
        matches!(self, Member::Method(_))
    }
}

impl<P> fmt::Debug for Member<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field(value) => f.debug_tuple("Field").field(value).finish(),
            Member::Method(_) => f.write_str("Method"),
        }
    }
}

/// Objects whose members can be looked up and invoked by name.
pub trait Reflect: fmt::Display + fmt::Debug + Sized {
    /// Type name reported in lookup errors.
    fn type_name(&self) -> &'static str;

    /// Resolve `name`, or `None` if the object has no such member.
    fn member(&self, name: &str) -> Option<Member<Self>>;
}

/// The two builder operations that accept caller-supplied literals.
pub trait Filterable: Reflect {
    /// Extend the filter tree with `criterion`.
    fn filter(&self, criterion: Criterion) -> Result<Self, BuilderError>;

    /// Assign `value` to `field`.
    fn assign(&self, field: &str, value: Value) -> Result<Self, BuilderError>;
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    /// A bare identifier (table or column name).
    Ident(String),
    Term(Term),
    Criterion(Criterion),
}

impl Arg {
    pub fn kind(&self) -> &'static str {
        match self {
            Arg::Value(_) => "value",
            Arg::Ident(_) => "identifier",
            Arg::Term(_) => "term",
            Arg::Criterion(_) => "criterion",
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Arg::Ident(name.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Criterion> for Arg {
    fn from(criterion: Criterion) -> Self {
        Arg::Criterion(criterion)
    }
}

impl From<Term> for Arg {
    fn from(term: Term) -> Self {
        Arg::Term(term)
    }
}

impl From<FieldRef> for Arg {
    fn from(field: FieldRef) -> Self {
        Arg::Term(Term::Field(field))
    }
}

/// Positional arguments, consumed front to back by the callee.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    items: VecDeque<Arg>,
    taken: usize,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument.
    pub fn with(mut self, arg: impl Into<Arg>) -> Self {
        self.items.push_back(arg.into());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn next(&mut self, expected: &'static str) -> Result<(usize, Arg), BuilderError> {
        let position = self.taken;
        let arg = self
            .items
            .pop_front()
            .ok_or(BuilderError::MissingArgument { position, expected })?;
        self.taken += 1;
        Ok((position, arg))
    }

    pub fn next_value(&mut self) -> Result<Value, BuilderError> {
        match self.next("value")? {
            (_, Arg::Value(value)) => Ok(value),
            (position, other) => Err(mismatch(position, "value", &other)),
        }
    }

    pub fn next_ident(&mut self) -> Result<String, BuilderError> {
        match self.next("identifier")? {
            (_, Arg::Ident(name)) => Ok(name),
            (position, other) => Err(mismatch(position, "identifier", &other)),
        }
    }

    pub fn next_criterion(&mut self) -> Result<Criterion, BuilderError> {
        match self.next("criterion")? {
            (_, Arg::Criterion(criterion)) => Ok(criterion),
            (position, other) => Err(mismatch(position, "criterion", &other)),
        }
    }

    /// A select-list term; a bare identifier names an unqualified column.
    pub fn next_term(&mut self) -> Result<Term, BuilderError> {
        match self.next("term")? {
            (_, Arg::Term(term)) => Ok(term),
            (_, Arg::Ident(name)) if name == "*" => Ok(Term::Star),
            (_, Arg::Ident(name)) => Ok(Term::Field(FieldRef::new(name))),
            (position, other) => Err(mismatch(position, "term", &other)),
        }
    }

    /// A non-negative integer count.
    pub fn next_count(&mut self) -> Result<u64, BuilderError> {
        match self.next("count")? {
            (_, Arg::Value(Value::Int(n))) if n >= 0 => Ok(n as u64),
            (position, other) => Err(mismatch(position, "count", &other)),
        }
    }

    /// Drain every remaining argument as a select-list term.
    pub fn rest_terms(&mut self) -> Result<Vec<Term>, BuilderError> {
        let mut terms = Vec::with_capacity(self.items.len());
        while !self.items.is_empty() {
            terms.push(self.next_term()?);
        }
        Ok(terms)
    }

    /// Fail if any argument was left unconsumed.
    pub fn finish(self) -> Result<(), BuilderError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(BuilderError::TooManyArguments {
                expected: self.taken,
                got: self.taken + self.items.len(),
            })
        }
    }
}

impl FromIterator<Arg> for Args {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            taken: 0,
        }
    }
}

fn mismatch(position: usize, expected: &'static str, found: &Arg) -> BuilderError {
    let found = match found {
        Arg::Value(value) => value.kind(),
        other => other.kind(),
    };
    BuilderError::ArgumentType {
        position,
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_consumption() {
        let mut args = Args::new()
            .with(Arg::ident("status"))
            .with(Value::from("open"));

        assert_eq!(args.next_ident().unwrap(), "status");
        assert_eq!(args.next_value().unwrap(), Value::from("open"));
        assert!(args.finish().is_ok());
    }

    #[test]
    fn test_missing_argument() {
        let mut args = Args::new().with(Arg::ident("status"));
        args.next_ident().unwrap();

        assert_eq!(
            args.next_value(),
            Err(BuilderError::MissingArgument {
                position: 1,
                expected: "value"
            })
        );
    }

    #[test]
    fn test_type_mismatch_reports_value_kind() {
        let mut args = Args::new().with(Value::Int(3));
        assert_eq!(
            args.next_ident(),
            Err(BuilderError::ArgumentType {
                position: 0,
                expected: "identifier",
                found: "int"
            })
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let mut args = Args::new().with(Value::Int(1)).with(Value::Int(2));
        args.next_count().unwrap();
        assert_eq!(
            args.finish(),
            Err(BuilderError::TooManyArguments {
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn test_terms_from_identifiers() {
        let mut args: Args = vec![
            Arg::ident("*"),
            Arg::ident("name"),
            Arg::from(FieldRef::qualified("tabNote", "title")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            args.rest_terms().unwrap(),
            vec![
                Term::Star,
                Term::Field(FieldRef::new("name")),
                Term::Field(FieldRef::qualified("tabNote", "title")),
            ]
        );
    }

    #[test]
    fn test_negative_count_rejected() {
        let mut args = Args::new().with(Value::Int(-1));
        assert!(matches!(
            args.next_count(),
            Err(BuilderError::ArgumentType { expected: "count", .. })
        ));
    }
}
