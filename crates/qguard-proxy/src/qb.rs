//! Entry point handing out sanitizing proxies around fresh builders.

use qguard_core::{Escape, QguardConfig, SqlEscaper};
use qguard_query::{Query, Table};

use crate::error::ProxyError;
use crate::sanitize::SanitizingProxy;

/// Query factory. Every query it returns is already wrapped, so callers never
/// hold an unsanitized builder.
#[derive(Debug, Clone)]
pub struct Qb<E = SqlEscaper> {
    config: QguardConfig,
    escaper: E,
}

impl Qb {
    /// A factory escaping with the dialect and options from `config`.
    pub fn new(config: QguardConfig) -> Self {
        let escaper = SqlEscaper::from_config(&config);
        Self { config, escaper }
    }
}

impl Default for Qb {
    fn default() -> Self {
        Self::new(QguardConfig::default())
    }
}

impl<E: Escape + Clone> Qb<E> {
    /// A factory with a caller-supplied escaping function.
    pub fn with_escaper(config: QguardConfig, escaper: E) -> Self {
        Self { config, escaper }
    }

    pub fn config(&self) -> &QguardConfig {
        &self.config
    }

    /// An empty select query.
    pub fn query(&self) -> SanitizingProxy<Query, E> {
        SanitizingProxy::new(Query::new(self.config.dialect), self.escaper.clone())
    }

    pub fn table(&self, name: &str) -> Table {
        Table::new(name)
    }

    /// The table backing a document type.
    pub fn doctype(&self, name: &str) -> Table {
        Table::doctype(name, &self.config.query)
    }

    pub fn from_(&self, table: impl Into<String>) -> SanitizingProxy<Query, E> {
        let query = Query::new(self.config.dialect).from_(table);
        SanitizingProxy::new(query, self.escaper.clone())
    }

    pub fn update(
        &self,
        table: impl Into<String>,
    ) -> Result<SanitizingProxy<Query, E>, ProxyError> {
        let query = Query::new(self.config.dialect).update(table)?;
        Ok(SanitizingProxy::new(query, self.escaper.clone()))
    }

    pub fn delete_from(
        &self,
        table: impl Into<String>,
    ) -> Result<SanitizingProxy<Query, E>, ProxyError> {
        let query = Query::new(self.config.dialect).from_(table).delete()?;
        Ok(SanitizingProxy::new(query, self.escaper.clone()))
    }
}
