//! `qguard render` command implementation.
//!
//! Drives a sanitizing proxy by method name from a [`QueryPlan`] and prints
//! the resulting SQL.

use std::path::Path;

use anyhow::{Context, Result};
use qguard_core::{Arg, Args, Escape, Value};
use qguard_proxy::{Proxy, Qb, SanitizingProxy};
use qguard_query::{Query, count_star};

use crate::plan::{PlanKind, QueryPlan};

/// Render the plan at `path` and print it.
pub fn run<E: Escape + Clone>(qb: &Qb<E>, path: &Path) -> Result<()> {
    let plan = QueryPlan::from_file(path)?;
    let sql = render(qb, &plan)?;
    println!("{}", sql);
    Ok(())
}

/// Build the plan's query through the proxy and return its SQL.
pub fn render<E: Escape + Clone>(qb: &Qb<E>, plan: &QueryPlan) -> Result<String> {
    let table = if plan.doctype {
        qb.doctype(&plan.table)
    } else {
        qb.table(&plan.table)
    };
    let table = table.name().to_string();
    tracing::debug!(table = %table, kind = ?plan.kind, "rendering plan");

    let mut query = qb.query();
    match plan.kind {
        PlanKind::Select => {
            query = step(&query, "from_", Args::new().with(Arg::ident(&table)))?;
            let mut select = Args::new();
            if plan.count {
                select = select.with(count_star());
            }
            for column in &plan.select {
                select = select.with(Arg::ident(column));
            }
            if select.is_empty() {
                select = select.with(Arg::ident("*"));
            }
            query = step(&query, "select", select)?;
            if plan.distinct {
                query = step(&query, "distinct", Args::new())?;
            }
        }
        PlanKind::Update => {
            query = step(&query, "update", Args::new().with(Arg::ident(&table)))?;
            for assignment in &plan.set {
                let args = Args::new()
                    .with(Arg::ident(&assignment.field))
                    .with(assignment.value.clone());
                query = step(&query, "set", args)?;
            }
        }
        PlanKind::Delete => {
            query = step(&query, "from_", Args::new().with(Arg::ident(&table)))?;
            query = step(&query, "delete", Args::new())?;
        }
    }

    for condition in &plan.conditions {
        let criterion = condition.to_criterion()?;
        query = step(&query, "where", Args::new().with(criterion))?;
    }
    for ordering in &plan.order_by {
        let mut args = Args::new().with(Arg::ident(&ordering.field));
        if let Some(order) = &ordering.order {
            args = args.with(Arg::ident(order));
        }
        query = step(&query, "orderby", args)?;
    }
    if let Some(limit) = plan.limit {
        query = step(&query, "limit", Args::new().with(Value::Int(limit)))?;
    }
    if let Some(offset) = plan.offset {
        query = step(&query, "offset", Args::new().with(Value::Int(offset)))?;
    }

    let sql = query
        .resolve("get_sql", Args::new())
        .context("Failed to render query")?;
    Ok(sql)
}

fn step<E: Escape + Clone>(
    query: &SanitizingProxy<Query, E>,
    method: &str,
    args: Args,
) -> Result<SanitizingProxy<Query, E>> {
    query
        .chain(method, args)
        .with_context(|| format!("'{}' failed", method))
}
