//! `qguard escape` command implementation.

use anyhow::{Context, Result, bail};
use qguard_core::{Escape, Value};

/// How the raw command-line argument should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueKind {
    #[default]
    Text,
    Int,
    Float,
    Bool,
    Null,
}

/// Parse `raw` as a value of `kind`.
pub fn parse_value(raw: Option<&str>, kind: ValueKind) -> Result<Value> {
    if kind == ValueKind::Null {
        if raw.is_some() {
            bail!("--null takes no value");
        }
        return Ok(Value::Null);
    }
    let Some(raw) = raw else {
        bail!("a value is required");
    };
    let value = match kind {
        ValueKind::Text => Value::from(raw),
        ValueKind::Int => Value::Int(
            raw.parse()
                .with_context(|| format!("'{}' is not an integer", raw))?,
        ),
        ValueKind::Float => Value::Float(
            raw.parse()
                .with_context(|| format!("'{}' is not a number", raw))?,
        ),
        ValueKind::Bool => Value::Bool(
            raw.parse()
                .with_context(|| format!("'{}' is not true or false", raw))?,
        ),
        ValueKind::Null => Value::Null,
    };
    Ok(value)
}

/// Escape `value` and return the SQL literal.
pub fn escape(escaper: &impl Escape, value: &Value) -> Result<String> {
    let escaped = escaper.escape(value).context("Failed to escape value")?;
    tracing::debug!(kind = value.kind(), "escaped value");
    Ok(escaped.to_string())
}

pub fn run(escaper: &impl Escape, raw: Option<&str>, kind: ValueKind) -> Result<()> {
    let value = parse_value(raw, kind)?;
    println!("{}", escape(escaper, &value)?);
    Ok(())
}
