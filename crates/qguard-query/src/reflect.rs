//! Method table exposing [`Query`] to name-based callers.

use qguard_core::{Args, BuilderError, Member, Reflect, Returned, Term, Value};

use crate::query::{Order, Query};

type Call = Result<Returned<Query>, BuilderError>;

impl Reflect for Query {
    fn type_name(&self) -> &'static str {
        "Query"
    }

    fn member(&self, name: &str) -> Option<Member<Self>> {
        let member: Member<Self> = match name {
            "from_" => Member::Method(call_from),
            "select" => Member::Method(call_select),
            "distinct" => Member::Method(call_distinct),
            "where" => Member::Method(call_where),
            "update" => Member::Method(call_update),
            "set" => Member::Method(call_set),
            "delete" => Member::Method(call_delete),
            "orderby" => Member::Method(call_orderby),
            "limit" => Member::Method(call_limit),
            "offset" => Member::Method(call_offset),
            "get_sql" => Member::Method(call_get_sql),

            "kind" => Member::Field(Value::from(self.kind().as_str())),
            "dialect" => Member::Field(Value::from(self.dialect().as_str())),
            "table_count" => Member::Field(Value::Int(self.tables().len() as i64)),
            "is_distinct" => Member::Field(Value::Bool(self.is_distinct())),
            "has_where" => Member::Field(Value::Bool(self.criterion().is_some())),
            "row_limit" => Member::Field(
                self.row_limit()
                    .map_or(Value::Null, |n| Value::Int(n as i64)),
            ),
            _ => return None,
        };
        Some(member)
    }
}

fn call_from(q: &Query, mut args: Args) -> Call {
    let table = args.next_ident()?;
    args.finish()?;
    Ok(Returned::Builder(q.from_(table)))
}

fn call_select(q: &Query, mut args: Args) -> Call {
    let terms: Vec<Term> = args.rest_terms()?;
    Ok(Returned::Builder(q.select(terms)?))
}

fn call_distinct(q: &Query, args: Args) -> Call {
    args.finish()?;
    Ok(Returned::Builder(q.distinct()))
}

fn call_where(q: &Query, mut args: Args) -> Call {
    let criterion = args.next_criterion()?;
    args.finish()?;
    Ok(Returned::Builder(q.where_(criterion)))
}

fn call_update(q: &Query, mut args: Args) -> Call {
    let table = args.next_ident()?;
    args.finish()?;
    Ok(Returned::Builder(q.update(table)?))
}

fn call_set(q: &Query, mut args: Args) -> Call {
    let field = args.next_ident()?;
    let value = args.next_value()?;
    args.finish()?;
    Ok(Returned::Builder(q.set(field, value)?))
}

fn call_delete(q: &Query, args: Args) -> Call {
    args.finish()?;
    Ok(Returned::Builder(q.delete()?))
}

fn call_orderby(q: &Query, mut args: Args) -> Call {
    let field = match args.next_term()? {
        Term::Field(field) => field,
        _ => {
            return Err(BuilderError::ArgumentType {
                position: 0,
                expected: "column",
                found: "term",
            });
        }
    };
    let order = if args.is_empty() {
        Order::default()
    } else {
        parse_order(args.next_ident()?)?
    };
    args.finish()?;
    Ok(Returned::Builder(q.orderby(field, order)))
}

fn parse_order(direction: String) -> Result<Order, BuilderError> {
    direction.parse().map_err(|_| BuilderError::ArgumentType {
        position: 1,
        expected: "asc or desc",
        found: "identifier",
    })
}

fn call_limit(q: &Query, mut args: Args) -> Call {
    let limit = args.next_count()?;
    args.finish()?;
    Ok(Returned::Builder(q.limit(limit)))
}

fn call_offset(q: &Query, mut args: Args) -> Call {
    let offset = args.next_count()?;
    args.finish()?;
    Ok(Returned::Builder(q.offset(offset)))
}

fn call_get_sql(q: &Query, args: Args) -> Call {
    args.finish()?;
    Ok(Returned::Text(q.get_sql()?))
}
