//! Escaping functions that turn raw values into SQL literals.

use crate::config::{Dialect, QguardConfig};
use crate::error::EscapeError;
use crate::value::Value;

/// Renders a raw value safe for inclusion in a query.
///
/// Implementations must be deterministic. They are not required to be
/// idempotent: escaping an [`Value::Escaped`] value again quotes it again.
pub trait Escape {
    fn escape(&self, value: &Value) -> Result<Value, EscapeError>;
}

impl<F> Escape for F
where
    F: Fn(&Value) -> Result<Value, EscapeError>,
{
    fn escape(&self, value: &Value) -> Result<Value, EscapeError> {
        self(value)
    }
}

/// String-literal escaping for the supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlEscaper {
    dialect: Dialect,
    escape_percent: bool,
}

impl Default for SqlEscaper {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl SqlEscaper {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            escape_percent: false,
        }
    }

    /// Build an escaper from the `dialect` and `escape` sections of a config.
    pub fn from_config(config: &QguardConfig) -> Self {
        Self::new(config.dialect).with_percent(config.escape.percent)
    }

    /// Double `%` so the literal survives `%`-style parameter substitution.
    pub fn with_percent(mut self, escape_percent: bool) -> Self {
        self.escape_percent = escape_percent;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Quote `raw` as a string literal.
    pub fn quote_text(&self, raw: &str) -> Result<String, EscapeError> {
        let mut quoted = match self.dialect {
            Dialect::MariaDb => quote_mariadb(raw),
            Dialect::Postgres => quote_postgres(raw)?,
        };
        if self.escape_percent {
            quoted = quoted.replace('%', "%%");
        }
        Ok(quoted)
    }
}

impl Escape for SqlEscaper {
    fn escape(&self, value: &Value) -> Result<Value, EscapeError> {
        let sql = match value {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => match (self.dialect, b) {
                (Dialect::MariaDb, true) => "1".to_string(),
                (Dialect::MariaDb, false) => "0".to_string(),
                (Dialect::Postgres, true) => "true".to_string(),
                (Dialect::Postgres, false) => "false".to_string(),
            },
            Value::Int(i) => i.to_string(),
            Value::Float(x) if !x.is_finite() => return Err(EscapeError::NonFinite(*x)),
            Value::Float(x) => x.to_string(),
            Value::Text(raw) | Value::Escaped(raw) => self.quote_text(raw)?,
        };
        Ok(Value::Escaped(sql))
    }
}

fn quote_mariadb(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for ch in raw.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}

fn quote_postgres(raw: &str) -> Result<String, EscapeError> {
    if raw.contains('\0') {
        return Err(EscapeError::NulByte);
    }
    let has_backslash = raw.contains('\\');
    let mut out = String::with_capacity(raw.len() + 3);
    if has_backslash {
        out.push('E');
    }
    out.push('\'');
    for ch in raw.chars() {
        match ch {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('\'');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(s: &str) -> Value {
        Value::Escaped(s.to_string())
    }

    #[test]
    fn test_mariadb_text() {
        let e = SqlEscaper::new(Dialect::MariaDb);
        assert_eq!(e.escape(&Value::from("x")).unwrap(), escaped("'x'"));
        assert_eq!(
            e.escape(&Value::from("O'Brien")).unwrap(),
            escaped(r"'O\'Brien'")
        );
        assert_eq!(
            e.escape(&Value::from("a\\b\n\"c\"")).unwrap(),
            escaped(r#"'a\\b\n\"c\"'"#)
        );
        assert_eq!(e.escape(&Value::from("\0\x1a")).unwrap(), escaped(r"'\0\Z'"));
    }

    #[test]
    fn test_postgres_text() {
        let e = SqlEscaper::new(Dialect::Postgres);
        assert_eq!(
            e.escape(&Value::from("O'Brien")).unwrap(),
            escaped("'O''Brien'")
        );
        assert_eq!(e.escape(&Value::from(r"a\b")).unwrap(), escaped(r"E'a\\b'"));
        assert_eq!(
            e.escape(&Value::from("nul\0")),
            Err(EscapeError::NulByte)
        );
    }

    #[test]
    fn test_scalars() {
        let maria = SqlEscaper::new(Dialect::MariaDb);
        let pg = SqlEscaper::new(Dialect::Postgres);

        assert_eq!(maria.escape(&Value::Null).unwrap(), escaped("NULL"));
        assert_eq!(maria.escape(&Value::Int(-4)).unwrap(), escaped("-4"));
        assert_eq!(maria.escape(&Value::Float(1.5)).unwrap(), escaped("1.5"));
        assert_eq!(maria.escape(&Value::Bool(true)).unwrap(), escaped("1"));
        assert_eq!(pg.escape(&Value::Bool(false)).unwrap(), escaped("false"));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let e = SqlEscaper::default();
        assert!(matches!(
            e.escape(&Value::Float(f64::NAN)),
            Err(EscapeError::NonFinite(_))
        ));
        assert_eq!(
            e.escape(&Value::Float(f64::INFINITY)),
            Err(EscapeError::NonFinite(f64::INFINITY))
        );
    }

    #[test]
    fn test_percent_doubling() {
        let e = SqlEscaper::new(Dialect::MariaDb).with_percent(true);
        assert_eq!(e.escape(&Value::from("50%")).unwrap(), escaped("'50%%'"));

        let plain = SqlEscaper::new(Dialect::MariaDb);
        assert_eq!(plain.escape(&Value::from("50%")).unwrap(), escaped("'50%'"));
    }

    #[test]
    fn test_not_idempotent() {
        let e = SqlEscaper::new(Dialect::Postgres);
        let once = e.escape(&Value::from("x")).unwrap();
        let twice = e.escape(&once).unwrap();
        assert_eq!(once, escaped("'x'"));
        assert_eq!(twice, escaped("'''x'''"));
    }

    #[test]
    fn test_closure_is_escaper() {
        let upper = |value: &Value| -> Result<Value, EscapeError> {
            Ok(Value::Escaped(value.to_string().to_uppercase()))
        };
        assert_eq!(upper.escape(&Value::from("ab")).unwrap(), escaped("AB"));
    }

    #[test]
    fn test_from_config() {
        let mut config = QguardConfig::default();
        config.dialect = Dialect::Postgres;
        config.escape.percent = true;

        let e = SqlEscaper::from_config(&config);
        assert_eq!(e.dialect(), Dialect::Postgres);
        assert_eq!(e.escape(&Value::from("%")).unwrap(), escaped("'%%'"));
    }
}
