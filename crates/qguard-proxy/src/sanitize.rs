//! The sanitizing proxy.
//!
//! [`SanitizingProxy`] forwards everything to its payload like
//! [`Holder`](crate::Holder) does, except the two operations that accept
//! literals. `where` walks the criterion tree and escapes every literal leaf in
//! place before handing the tree over; `set` escapes its value. Builder results
//! are re-wrapped in a new `SanitizingProxy` carrying the same escaper, so the
//! overrides stay active for the whole chain.
//!
//! Both operations take their tree or value by value. A criterion handed to
//! `where` is moved into the payload and cannot be sanitized twice; passing a
//! clone escapes the clone's literals again.

use std::fmt;

use qguard_core::{Args, Criterion, Escape, EscapeError, Filterable, SqlEscaper, Value};

use crate::error::ProxyError;
use crate::holder::{Override, Proxy};
use crate::pseudo::Outcome;

pub struct SanitizingProxy<B, E = SqlEscaper> {
    payload: B,
    escaper: E,
}

impl<B, E> SanitizingProxy<B, E>
where
    B: Filterable,
    E: Escape + Clone,
{
    pub fn new(payload: B, escaper: E) -> Self {
        Self { payload, escaper }
    }

    pub fn into_inner(self) -> B {
        self.payload
    }

    pub fn escaper(&self) -> &E {
        &self.escaper
    }

    /// Escape every literal in `criterion`, then filter the payload with it.
    pub fn where_(&self, mut criterion: Criterion) -> Result<Self, ProxyError> {
        let escaped = self.sanitize(&mut criterion)?;
        tracing::debug!(
            payload = self.payload.type_name(),
            escaped,
            nodes = criterion.len(),
            "sanitized conditional clause"
        );
        let next = self.payload.filter(criterion)?;
        self.redirect(next)
    }

    /// Escape `value`, then assign it to `field` on the payload.
    pub fn set(&self, field: &str, value: impl Into<Value>) -> Result<Self, ProxyError> {
        let escaped = self.escaper.escape(&value.into())?;
        tracing::debug!(payload = self.payload.type_name(), field, "sanitized assignment");
        let next = self.payload.assign(field, escaped)?;
        self.redirect(next)
    }

    /// Escape every literal leaf reachable from the root, returning how many
    /// were replaced. On error the tree may be partially escaped.
    ///
    /// The walk keeps its own stack, so value lists of any length are safe.
    pub fn sanitize(&self, criterion: &mut Criterion) -> Result<usize, EscapeError> {
        let mut escaped = 0;
        let mut stack = vec![criterion.root()];
        while let Some(id) = stack.pop() {
            if let Some(right) = criterion.right(id) {
                stack.push(right);
            }
            if let Some(left) = criterion.left(id) {
                stack.push(left);
            }
            if let Some(value) = criterion.literal_mut(id) {
                *value = self.escaper.escape(value)?;
                escaped += 1;
            }
        }
        Ok(escaped)
    }
}

type Intercepted<B, E> = Result<Outcome<SanitizingProxy<B, E>>, ProxyError>;

fn where_by_name<B, E>(proxy: &SanitizingProxy<B, E>, mut args: Args) -> Intercepted<B, E>
where
    B: Filterable,
    E: Escape + Clone,
{
    let criterion = args.next_criterion()?;
    args.finish()?;
    proxy.where_(criterion).map(Outcome::Proxy)
}

fn set_by_name<B, E>(proxy: &SanitizingProxy<B, E>, mut args: Args) -> Intercepted<B, E>
where
    B: Filterable,
    E: Escape + Clone,
{
    let field = args.next_ident()?;
    let value = args.next_value()?;
    args.finish()?;
    proxy.set(&field, value).map(Outcome::Proxy)
}

impl<B, E> Proxy for SanitizingProxy<B, E>
where
    B: Filterable,
    E: Escape + Clone,
{
    type Payload = B;

    fn payload(&self) -> &B {
        &self.payload
    }

    fn redirect(&self, result: B) -> Result<Self, ProxyError> {
        Ok(SanitizingProxy::new(result, self.escaper.clone()))
    }

    fn intercept(&self, name: &str) -> Option<Override<Self>> {
        match name {
            "where" => Some(where_by_name::<B, E>),
            "set" => Some(set_by_name::<B, E>),
            _ => None,
        }
    }
}

impl<B: Filterable, E> fmt::Display for SanitizingProxy<B, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.payload, f)
    }
}

impl<B: Filterable, E> fmt::Debug for SanitizingProxy<B, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.payload, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qguard_core::{Arg, Comparator, Dialect, FieldRef, Node};
    use qguard_query::{Field, Query};
    use pretty_assertions::assert_eq;

    fn tag(value: &Value) -> Result<Value, EscapeError> {
        Ok(Value::Escaped(format!("<{}>", value)))
    }

    type TagFn = fn(&Value) -> Result<Value, EscapeError>;

    fn proxy(query: Query) -> SanitizingProxy<Query, TagFn> {
        SanitizingProxy::new(query, tag as TagFn)
    }

    fn escaped(s: &str) -> Value {
        Value::Escaped(s.to_string())
    }

    #[test]
    fn test_sanitize_counts_literals_only() {
        let p = proxy(Query::default());
        let mut c = Field::new("a").eq(1) & Field::new("owner").isnotnull();
        let shape = c.shape();

        assert_eq!(p.sanitize(&mut c).unwrap(), 1);
        assert_eq!(c.literals(), vec![&escaped("<1>")]);
        assert_eq!(c.shape(), shape);
    }

    #[test]
    fn test_sanitize_list_elements() {
        let p = proxy(Query::default());
        let mut c = Field::new("status").isin(["Open", "Closed"]);
        assert_eq!(p.sanitize(&mut c).unwrap(), 2);
        assert_eq!(c.literals(), vec![&escaped("<Open>"), &escaped("<Closed>")]);
    }

    #[test]
    fn test_sanitize_long_list() {
        let p = proxy(Query::default());
        let mut c = Field::new("id").isin(0..100_000) | Field::new("id").isnull();
        assert_eq!(p.sanitize(&mut c).unwrap(), 100_000);

        let literals = c.literals();
        assert_eq!(literals[0], &escaped("<0>"));
        assert_eq!(literals[99_999], &escaped("<99999>"));
    }

    #[test]
    fn test_where_escapes_before_delegating() {
        let p = proxy(Query::default().from_("tabNote"));
        let next = p.where_(Field::new("title").eq("x")).unwrap();
        let literals = next.payload().criterion().unwrap().literals();
        assert_eq!(literals, vec![&escaped("<x>")]);
    }

    #[test]
    fn test_field_to_field_comparison_untouched() {
        let p = proxy(Query::default().from_("t"));
        let c = Criterion::compare(
            Comparator::Eq,
            Criterion::field(FieldRef::new("a")),
            Criterion::field(FieldRef::new("b")),
        );
        let next = p.where_(c.clone()).unwrap();
        assert_eq!(next.payload().criterion(), Some(&c));
    }

    #[test]
    fn test_set_escapes_value() {
        let p = proxy(Query::default().update("tabUser").unwrap());
        let next = p.set("full_name", "O'Brien").unwrap();
        assert_eq!(
            next.payload().assignments(),
            [("full_name".to_string(), escaped("<O'Brien>"))]
        );
    }

    #[test]
    fn test_overrides_reachable_by_name() {
        let p = proxy(Query::default().update("tabUser").unwrap());
        assert!(matches!(p.attr("where").unwrap(), crate::Attr::Method(m) if m.is_intercepted()));

        let next = p
            .chain("set", Args::new().with(Arg::ident("enabled")).with(Value::Int(0)))
            .unwrap()
            .chain("where", Args::new().with(Field::new("name").eq("bob")))
            .unwrap();
        assert_eq!(next.payload().assignments()[0].1, escaped("<0>"));
        assert_eq!(
            next.payload().criterion().unwrap().literals(),
            vec![&escaped("<bob>")]
        );
    }

    #[test]
    fn test_by_name_argument_errors() {
        let p = proxy(Query::default().from_("t"));
        assert!(matches!(
            p.call("where", Args::new()),
            Err(ProxyError::Builder(qguard_core::BuilderError::MissingArgument { .. }))
        ));
    }

    #[test]
    fn test_escape_error_propagates() {
        fn refuse(_: &Value) -> Result<Value, EscapeError> {
            Err(EscapeError::Unsupported { kind: "test" })
        }
        let p = SanitizingProxy::new(Query::default().from_("t"), refuse);
        assert_eq!(
            p.where_(Field::new("a").eq(1)).unwrap_err(),
            ProxyError::Escape(EscapeError::Unsupported { kind: "test" })
        );
        assert!(p.set("a", 1).is_err());
    }

    #[test]
    fn test_builder_error_propagates() {
        let p = proxy(Query::default().from_("t"));
        assert!(matches!(
            p.set("a", 1),
            Err(ProxyError::Builder(qguard_core::BuilderError::InvalidOperation { .. }))
        ));
    }

    #[test]
    fn test_sql_escaper_end_to_end() {
        let p = SanitizingProxy::new(
            Query::new(Dialect::Postgres),
            SqlEscaper::new(Dialect::Postgres),
        );
        let sql = p
            .chain("from_", Args::new().with(Arg::ident("tabNote")))
            .unwrap()
            .chain("select", Args::new().with(Arg::ident("*")))
            .unwrap()
            .where_(Field::new("title").eq("it's"))
            .unwrap()
            .resolve("get_sql", Args::new())
            .unwrap();
        assert_eq!(sql, "SELECT * FROM \"tabNote\" WHERE \"title\" = 'it''s'");
    }

    #[test]
    fn test_sanitize_leaves_non_literal_nodes() {
        let p = proxy(Query::default());
        let mut c = Criterion::null_check(FieldRef::new("a"), false);
        assert_eq!(p.sanitize(&mut c).unwrap(), 0);
        assert!(matches!(c.node(c.root()), Node::NullCheck { .. }));
    }
}
