//! SQL text generation for criteria, terms and values.

use qguard_core::{Connective, Criterion, Dialect, FieldRef, Node, NodeId, Term, Value};

/// Renders query fragments for one dialect.
#[derive(Debug, Clone, Copy)]
pub struct SqlWriter {
    dialect: Dialect,
}

impl SqlWriter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Quote an identifier, doubling any embedded quote character.
    pub fn ident(&self, name: &str) -> String {
        let quote = self.dialect.identifier_quote();
        let mut out = String::with_capacity(name.len() + 2);
        out.push(quote);
        for ch in name.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }

    pub fn field(&self, field: &FieldRef) -> String {
        match &field.table {
            Some(table) => format!("{}.{}", self.ident(table), self.ident(&field.name)),
            None => self.ident(&field.name),
        }
    }

    /// Render a literal.
    ///
    /// Raw text is wrapped in quotes but not escaped. Escaped values are
    /// emitted verbatim.
    pub fn value(&self, value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(true) => "TRUE".to_string(),
            Value::Bool(false) => "FALSE".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => x.to_string(),
            Value::Text(s) => format!("'{}'", s),
            Value::Escaped(sql) => sql.clone(),
        }
    }

    pub fn term(&self, term: &Term) -> String {
        match term {
            Term::Star => "*".to_string(),
            Term::Field(field) => self.field(field),
            Term::Count(None) => "COUNT(*)".to_string(),
            Term::Count(Some(field)) => format!("COUNT({})", self.field(field)),
            Term::Aliased { term, alias } => format!("{} AS {}", self.term(term), self.ident(alias)),
        }
    }

    /// Render a criterion tree.
    ///
    /// Works from an explicit stack; deep trees and long value lists do not
    /// grow the call stack.
    pub fn criterion(&self, criterion: &Criterion) -> String {
        let mut out = String::new();
        let mut stack = vec![Emit::Node(criterion.root())];
        while let Some(item) = stack.pop() {
            match item {
                Emit::Text(text) => out.push_str(text),
                Emit::Operand(parent, id) => match criterion.node(id) {
                    // Nested logic of the other connective needs parentheses.
                    Node::Logic { op, .. } if *op != parent => {
                        stack.push(Emit::Text(")"));
                        stack.push(Emit::Node(id));
                        stack.push(Emit::Text("("));
                    }
                    _ => stack.push(Emit::Node(id)),
                },
                Emit::Node(id) => self.node(criterion, id, &mut stack, &mut out),
            }
        }
        out
    }

    // Pushes pending work in reverse so it pops in output order.
    fn node(&self, c: &Criterion, id: NodeId, stack: &mut Vec<Emit>, out: &mut String) {
        match c.node(id) {
            Node::Literal(value) => out.push_str(&self.value(value)),
            Node::Field(field) => out.push_str(&self.field(field)),
            Node::NullCheck { field, negated } => {
                out.push_str(&self.field(field));
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Node::Compare { op, left, right } => {
                if matches!(c.node(*right), Node::List { .. } | Node::Empty) {
                    stack.push(Emit::Text(")"));
                    stack.push(Emit::Node(*right));
                    stack.push(Emit::Text("("));
                } else {
                    stack.push(Emit::Node(*right));
                }
                stack.push(Emit::Text(" "));
                stack.push(Emit::Text(op.sql()));
                stack.push(Emit::Text(" "));
                stack.push(Emit::Node(*left));
            }
            Node::Logic { op, left, right } => {
                stack.push(Emit::Operand(*op, *right));
                stack.push(Emit::Text(" "));
                stack.push(Emit::Text(op.sql()));
                stack.push(Emit::Text(" "));
                stack.push(Emit::Operand(*op, *left));
            }
            Node::List { left, right } => {
                stack.push(Emit::Node(*right));
                if matches!(c.node(*right), Node::List { .. }) {
                    stack.push(Emit::Text(","));
                }
                stack.push(Emit::Node(*left));
            }
            Node::Empty => {}
        }
    }
}

/// Pending output while rendering a criterion.
enum Emit {
    Node(NodeId),
    /// A child of a logic node with the given connective.
    Operand(Connective, NodeId),
    Text(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Field;
    use pretty_assertions::assert_eq;

    fn maria() -> SqlWriter {
        SqlWriter::new(Dialect::MariaDb)
    }

    #[test]
    fn test_ident_quoting() {
        assert_eq!(maria().ident("tabHas Role"), "`tabHas Role`");
        assert_eq!(maria().ident("a`b"), "`a``b`");
        assert_eq!(SqlWriter::new(Dialect::Postgres).ident("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_comparison() {
        let c = Field::of("tabComment", "seen").eq(0);
        assert_eq!(maria().criterion(&c), "`tabComment`.`seen` = 0");
    }

    #[test]
    fn test_precedence() {
        let c = (Field::new("a").eq(1) | Field::new("b").eq(2)) & Field::new("c").eq(3);
        assert_eq!(
            maria().criterion(&c),
            "(`a` = 1 OR `b` = 2) AND `c` = 3"
        );

        let same = Field::new("a").eq(1) & Field::new("b").eq(2) & Field::new("c").eq(3);
        assert_eq!(maria().criterion(&same), "`a` = 1 AND `b` = 2 AND `c` = 3");
    }

    #[test]
    fn test_in_list() {
        let c = Field::new("status").notin(["Spam", "Trash"]);
        assert_eq!(
            maria().criterion(&c),
            "`status` NOT IN ('Spam','Trash')"
        );

        let empty = Field::new("status").isin(Vec::<Value>::new());
        assert_eq!(maria().criterion(&empty), "`status` IN ()");
    }

    #[test]
    fn test_long_in_list() {
        let c = Field::new("id").isin(0..100_000);
        let sql = maria().criterion(&c);
        assert!(sql.starts_with("`id` IN (0,1,2,"));
        assert!(sql.ends_with(",99998,99999)"));
    }

    #[test]
    fn test_deep_and_chain() {
        let c = (1..50_000)
            .map(|i| Field::new("a").ne(i))
            .fold(Field::new("a").ne(0), |acc, next| acc & next);
        let sql = maria().criterion(&c);
        assert!(sql.starts_with("`a` <> 0 AND `a` <> 1 AND "));
        assert!(sql.ends_with(" AND `a` <> 49999"));
        assert!(!sql.contains('('));
    }

    #[test]
    fn test_null_check() {
        let c = Field::new("owner").isnotnull();
        assert_eq!(maria().criterion(&c), "`owner` IS NOT NULL");
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let c = Field::new("name").eq("x' OR '1'='1");
        assert_eq!(maria().criterion(&c), "`name` = 'x' OR '1'='1'");
    }

    #[test]
    fn test_escaped_value_verbatim() {
        assert_eq!(maria().value(&Value::Escaped("'a\\'b'".to_string())), "'a\\'b'");
    }

    #[test]
    fn test_terms() {
        let w = maria();
        assert_eq!(w.term(&Term::Count(None)), "COUNT(*)");
        assert_eq!(
            w.term(&Field::of("tabPage", "title").as_("title")),
            "`tabPage`.`title` AS `title`"
        );
    }
}
