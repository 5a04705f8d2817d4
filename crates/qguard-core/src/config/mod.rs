//! Configuration types for qguard.
//!
//! Configuration is loaded from a single YAML file (typically `qguard.yaml`).
//! Every section is optional and falls back to its defaults:
//!
//! ```yaml
//! dialect: mariadb
//! escape:
//!   percent: false
//! query:
//!   doctype_prefix: tab
//! ```

pub mod escape;
pub mod query;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use escape::EscapeConfig;
pub use query::QueryConfig;

/// Complete qguard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QguardConfig {
    /// SQL dialect used for identifier quoting and literal escaping.
    #[serde(default)]
    pub dialect: Dialect,

    /// Escaping options.
    #[serde(default)]
    pub escape: EscapeConfig,

    /// Query builder options.
    #[serde(default)]
    pub query: QueryConfig,
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MariaDB / MySQL: backtick identifiers, backslash escapes.
    #[default]
    #[serde(alias = "mysql")]
    MariaDb,
    /// PostgreSQL: double-quoted identifiers, doubled quotes.
    Postgres,
}

impl Dialect {
    /// Quote character for identifiers.
    pub fn identifier_quote(self) -> char {
        match self {
            Dialect::MariaDb => '`',
            Dialect::Postgres => '"',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::MariaDb => "mariadb",
            Dialect::Postgres => "postgres",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mariadb" | "mysql" => Ok(Dialect::MariaDb),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            other => Err(ConfigError::Config(format!("unknown dialect: {}", other))),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl QguardConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot constrain on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let quote = self.dialect.identifier_quote();
        if self.query.doctype_prefix.contains(quote) {
            return Err(ConfigError::Config(format!(
                "doctype_prefix must not contain the identifier quote {}",
                quote
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = QguardConfig::default();
        assert_eq!(config.dialect, Dialect::MariaDb);
        assert!(!config.escape.percent);
        assert_eq!(config.query.doctype_prefix, "tab");
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = QguardConfig::from_yaml("{}").unwrap();
        assert_eq!(config, QguardConfig::default());
    }

    #[test]
    fn test_parse_full() {
        let yaml = r#"
dialect: postgres
escape:
  percent: true
query:
  doctype_prefix: "doc_"
"#;
        let config = QguardConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.dialect, Dialect::Postgres);
        assert!(config.escape.percent);
        assert_eq!(config.query.doctype_prefix, "doc_");
    }

    #[test]
    fn test_mysql_alias() {
        let config = QguardConfig::from_yaml("dialect: mysql").unwrap();
        assert_eq!(config.dialect, Dialect::MariaDb);
    }

    #[test]
    fn test_unknown_dialect_rejected() {
        assert!(matches!(
            QguardConfig::from_yaml("dialect: oracle"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            "oracle".parse::<Dialect>(),
            Err(ConfigError::Config(_))
        ));
    }

    #[test]
    fn test_prefix_with_quote_rejected() {
        let result = QguardConfig::from_yaml("query:\n  doctype_prefix: \"a`b\"");
        assert!(matches!(result, Err(ConfigError::Config(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dialect: postgres").unwrap();

        let config = QguardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.dialect, Dialect::Postgres);
    }

    #[test]
    fn test_missing_file() {
        let result = QguardConfig::from_file("/nonexistent/qguard.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_dialect_from_str() {
        assert_eq!("PostgreSQL".parse::<Dialect>().unwrap(), Dialect::Postgres);
        assert_eq!("mariadb".parse::<Dialect>().unwrap(), Dialect::MariaDb);
        assert_eq!(Dialect::Postgres.to_string(), "postgres");
    }
}
