//! Declarative query plans read by `qguard render`.
//!
//! ```yaml
//! table: Comment
//! doctype: true
//! count: true
//! where:
//!   - { field: comment_type, value: Like }
//!   - any:
//!       - { field: owner, op: is_null }
//!       - { field: seen, op: "<", value: 1 }
//! order_by:
//!   - { field: modified, order: desc }
//! limit: 20
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use qguard_core::{Criterion, Value};
use qguard_query::Field;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    #[default]
    Select,
    Update,
    Delete,
}

/// A whole query.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryPlan {
    #[serde(default)]
    pub kind: PlanKind,

    pub table: String,

    /// Treat `table` as a document type and apply the configured prefix.
    #[serde(default)]
    pub doctype: bool,

    #[serde(default)]
    pub select: Vec<String>,

    /// Add `COUNT(*)` to the select list.
    #[serde(default)]
    pub count: bool,

    #[serde(default)]
    pub distinct: bool,

    /// Conditions, ANDed together.
    #[serde(default, rename = "where")]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub set: Vec<Assignment>,

    #[serde(default)]
    pub order_by: Vec<Ordering>,

    pub limit: Option<i64>,

    pub offset: Option<i64>,
}

impl QueryPlan {
    /// Load a plan; `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan: {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid JSON plan: {}", path.display()))
        } else {
            Self::from_yaml(&content)
                .with_context(|| format!("Invalid YAML plan: {}", path.display()))
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanOp {
    #[default]
    #[serde(alias = "=")]
    Eq,
    #[serde(alias = "!=", alias = "<>")]
    Ne,
    #[serde(alias = "<")]
    Lt,
    #[serde(alias = "<=")]
    Le,
    #[serde(alias = ">")]
    Gt,
    #[serde(alias = ">=")]
    Ge,
    Like,
    NotLike,
    In,
    NotIn,
    IsNull,
    IsNotNull,
}

/// A comparison, or a group of conditions joined by AND / OR.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Condition {
    All {
        all: Vec<Condition>,
    },
    Any {
        any: Vec<Condition>,
    },
    Compare {
        field: String,
        #[serde(default)]
        op: PlanOp,
        #[serde(default)]
        value: Option<Value>,
        #[serde(default)]
        values: Option<Vec<Value>>,
    },
}

impl Condition {
    pub fn to_criterion(&self) -> Result<Criterion> {
        match self {
            Condition::All { all } => join(all, "all", Criterion::and),
            Condition::Any { any } => join(any, "any", Criterion::or),
            Condition::Compare {
                field,
                op,
                value,
                values,
            } => compare(field, *op, value.as_ref(), values.as_deref()),
        }
    }
}

fn join(
    group: &[Condition],
    label: &str,
    combine: fn(Criterion, Criterion) -> Criterion,
) -> Result<Criterion> {
    let mut parts = group.iter().map(Condition::to_criterion);
    let Some(first) = parts.next() else {
        bail!("'{}' group has no conditions", label);
    };
    parts.try_fold(first?, |acc, next| Ok(combine(acc, next?)))
}

fn compare(
    name: &str,
    op: PlanOp,
    value: Option<&Value>,
    values: Option<&[Value]>,
) -> Result<Criterion> {
    let field = Field::new(name);
    let single = || {
        value
            .cloned()
            .with_context(|| {
                format!(
                    "condition on '{}' needs a value (match NULL with op: is_null or is_not_null)",
                    name
                )
            })
    };
    let list = || {
        values
            .map(<[Value]>::to_vec)
            .with_context(|| format!("condition on '{}' needs a list of values", name))
    };

    let criterion = match op {
        PlanOp::Eq => field.eq(single()?),
        PlanOp::Ne => field.ne(single()?),
        PlanOp::Lt => field.lt(single()?),
        PlanOp::Le => field.le(single()?),
        PlanOp::Gt => field.gt(single()?),
        PlanOp::Ge => field.ge(single()?),
        PlanOp::Like => field.like(single()?),
        PlanOp::NotLike => field.not_like(single()?),
        PlanOp::In => field.isin(list()?),
        PlanOp::NotIn => field.notin(list()?),
        PlanOp::IsNull => field.isnull(),
        PlanOp::IsNotNull => field.isnotnull(),
    };
    Ok(criterion)
}

/// One `SET field = value` of an update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assignment {
    pub field: String,
    pub value: Value,
}

/// One `ORDER BY` column; `order` is `asc` (default) or `desc`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Ordering {
    pub field: String,
    pub order: Option<String>,
}
