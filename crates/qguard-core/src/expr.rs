//! Arena-backed conditional expression trees.
//!
//! A [`Criterion`] owns every node of its tree in a flat `Vec`; children are
//! referenced by [`NodeId`]. Combining two criteria appends the right-hand arena
//! onto the left-hand one, so trees are always acyclic and finite.
//!
//! A node is composite exactly when it has both a left and a right child
//! ([`Node::left`] / [`Node::right`]). Literal values live only in
//! [`Node::Literal`] leaves.

use std::fmt;
use std::ops::{BitAnd, BitOr};

use crate::value::Value;

/// Index of a node inside its [`Criterion`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }

    fn shifted(self, offset: usize) -> Self {
        NodeId(self.0 + offset)
    }
}

/// Reference to a column, optionally qualified by its table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub table: Option<String>,
    pub name: String,
}

impl FieldRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
}

impl Comparator {
    pub fn sql(self) -> &'static str {
        match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Like => "LIKE",
            Comparator::NotLike => "NOT LIKE",
            Comparator::In => "IN",
            Comparator::NotIn => "NOT IN",
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    pub fn sql(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// One node of an expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A raw value destined for the rendered query.
    Literal(Value),
    /// A column reference.
    Field(FieldRef),
    /// `IS NULL` / `IS NOT NULL` on a column.
    NullCheck { field: FieldRef, negated: bool },
    Compare {
        op: Comparator,
        left: NodeId,
        right: NodeId,
    },
    Logic {
        op: Connective,
        left: NodeId,
        right: NodeId,
    },
    /// Cons cell of a value list: `left` is the element, `right` the tail.
    List { left: NodeId, right: NodeId },
    /// Terminator of a value list.
    Empty,
}

impl Node {
    pub fn left(&self) -> Option<NodeId> {
        match self {
            Node::Compare { left, .. } | Node::Logic { left, .. } | Node::List { left, .. } => {
                Some(*left)
            }
            _ => None,
        }
    }

    pub fn right(&self) -> Option<NodeId> {
        match self {
            Node::Compare { right, .. }
            | Node::Logic { right, .. }
            | Node::List { right, .. } => Some(*right),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.left().is_some() && self.right().is_some()
    }

    fn shifted(self, offset: usize) -> Self {
        match self {
            Node::Compare { op, left, right } => Node::Compare {
                op,
                left: left.shifted(offset),
                right: right.shifted(offset),
            },
            Node::Logic { op, left, right } => Node::Logic {
                op,
                left: left.shifted(offset),
                right: right.shifted(offset),
            },
            Node::List { left, right } => Node::List {
                left: left.shifted(offset),
                right: right.shifted(offset),
            },
            leaf => leaf,
        }
    }
}

/// A conditional expression tree stored in an arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Criterion {
    /// A tree consisting of a single leaf node.
    pub fn leaf(node: Node) -> Self {
        Self {
            nodes: vec![node],
            root: NodeId(0),
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self::leaf(Node::Literal(value.into()))
    }

    pub fn field(field: FieldRef) -> Self {
        Self::leaf(Node::Field(field))
    }

    pub fn null_check(field: FieldRef, negated: bool) -> Self {
        Self::leaf(Node::NullCheck { field, negated })
    }

    /// A value list, encoded as a right-leaning chain of [`Node::List`] cells.
    pub fn list<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let mut nodes = Vec::with_capacity(values.len() * 2 + 1);
        nodes.push(Node::Empty);
        let mut tail = NodeId(0);
        for value in values.into_iter().rev() {
            nodes.push(Node::Literal(value));
            let element = NodeId(nodes.len() - 1);
            nodes.push(Node::List {
                left: element,
                right: tail,
            });
            tail = NodeId(nodes.len() - 1);
        }
        Self { nodes, root: tail }
    }

    pub fn compare(op: Comparator, left: Criterion, right: Criterion) -> Self {
        left.join(right, |left, right| Node::Compare { op, left, right })
    }

    pub fn and(self, other: Criterion) -> Self {
        self.join(other, |left, right| Node::Logic {
            op: Connective::And,
            left,
            right,
        })
    }

    pub fn or(self, other: Criterion) -> Self {
        self.join(other, |left, right| Node::Logic {
            op: Connective::Or,
            left,
            right,
        })
    }

    fn join(mut self, other: Criterion, make: impl FnOnce(NodeId, NodeId) -> Node) -> Self {
        let left = self.root;
        let offset = self.nodes.len();
        let right = other.root.shifted(offset);
        self.nodes
            .extend(other.nodes.into_iter().map(|node| node.shifted(offset)));
        self.nodes.push(make(left, right));
        self.root = NodeId(self.nodes.len() - 1);
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node at `id`.
    ///
    /// # Panics
    ///
    /// Ids are only valid for the tree that issued them. Panics if `id` is
    /// out of range for this arena; use [`Criterion::get`] for ids of unknown
    /// origin.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// The node at `id`, or `None` if `id` belongs to a larger tree.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left()
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right()
    }

    /// Mutable access to the value of a literal leaf. `None` for other nodes
    /// and for ids outside this arena.
    pub fn literal_mut(&mut self, id: NodeId) -> Option<&mut Value> {
        match self.nodes.get_mut(id.0)? {
            Node::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Literal values reachable from the root, left before right.
    pub fn literals(&self) -> Vec<&Value> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let Node::Literal(value) = node {
                out.push(value);
            }
            if let Some(right) = node.right() {
                stack.push(right);
            }
            if let Some(left) = node.left() {
                stack.push(left);
            }
        }
        out
    }

    /// The tree with every literal blanked out, for structural comparison.
    pub fn shape(&self) -> Vec<Node> {
        self.nodes
            .iter()
            .map(|node| match node {
                Node::Literal(_) => Node::Literal(Value::Null),
                other => other.clone(),
            })
            .collect()
    }
}

impl BitAnd for Criterion {
    type Output = Criterion;

    fn bitand(self, rhs: Criterion) -> Criterion {
        self.and(rhs)
    }
}

impl BitOr for Criterion {
    type Output = Criterion;

    fn bitor(self, rhs: Criterion) -> Criterion {
        self.or(rhs)
    }
}

/// An item in a select list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Star,
    Field(FieldRef),
    /// `COUNT(*)` when no column is given.
    Count(Option<FieldRef>),
    Aliased { term: Box<Term>, alias: String },
}

impl Term {
    pub fn as_(self, alias: impl Into<String>) -> Self {
        Term::Aliased {
            term: Box::new(self),
            alias: alias.into(),
        }
    }
}

impl From<FieldRef> for Term {
    fn from(field: FieldRef) -> Self {
        Term::Field(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(name: &str, value: impl Into<Value>) -> Criterion {
        Criterion::compare(
            Comparator::Eq,
            Criterion::field(FieldRef::new(name)),
            Criterion::literal(value),
        )
    }

    #[test]
    fn test_compare_is_composite() {
        let c = eq("a", 1);
        assert!(c.node(c.root()).is_composite());
        assert_eq!(c.len(), 3);
        assert_eq!(c.literals(), vec![&Value::Int(1)]);
    }

    #[test]
    fn test_join_shifts_right_arena() {
        let c = eq("a", 1) & eq("b", 2);
        assert_eq!(c.len(), 7);

        let root = c.node(c.root());
        let left = root.left().unwrap();
        let right = root.right().unwrap();
        assert_eq!(left.index(), 2);
        assert_eq!(right.index(), 5);
        assert!(matches!(c.node(right), Node::Compare { .. }));
        assert_eq!(c.literals(), vec![&Value::Int(1), &Value::Int(2)]);
    }

    #[test]
    fn test_nested_literals_in_order() {
        let c = (eq("a", 1) | eq("b", 2)) & eq("c", 3);
        assert_eq!(
            c.literals(),
            vec![&Value::Int(1), &Value::Int(2), &Value::Int(3)]
        );
    }

    #[test]
    fn test_list_chain() {
        let c = Criterion::list(["x", "y"]);
        assert!(c.node(c.root()).is_composite());
        assert_eq!(
            c.literals(),
            vec![&Value::from("x"), &Value::from("y")]
        );

        let empty = Criterion::list(Vec::<Value>::new());
        assert_eq!(empty.node(empty.root()), &Node::Empty);
        assert!(empty.literals().is_empty());
    }

    #[test]
    fn test_literal_mut() {
        let mut c = eq("a", "x");
        let root = c.root();
        assert!(c.literal_mut(root).is_none());

        let right = c.right(root).unwrap();
        *c.literal_mut(right).unwrap() = Value::Escaped("'x'".to_string());
        assert_eq!(c.literals(), vec![&Value::Escaped("'x'".to_string())]);
    }

    #[test]
    fn test_foreign_ids() {
        let big = eq("a", 1) & eq("b", 2);
        let mut small = Criterion::literal("x");
        let foreign = big.root();

        assert!(small.get(foreign).is_none());
        assert!(small.literal_mut(foreign).is_none());
        assert_eq!(small.get(small.root()), Some(&Node::Literal(Value::from("x"))));
    }

    #[test]
    fn test_null_check_is_leaf() {
        let c = Criterion::null_check(FieldRef::new("owner"), true);
        assert!(!c.node(c.root()).is_composite());
        assert!(c.literals().is_empty());
    }

    #[test]
    fn test_shape_ignores_literals() {
        let a = eq("a", 1) & eq("b", "two");
        let b = eq("a", 9) & eq("b", Value::Escaped("'x'".to_string()));
        assert_eq!(a.shape(), b.shape());
    }
}
