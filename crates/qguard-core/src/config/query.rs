//! Query builder options.

use serde::{Deserialize, Serialize};

/// Options for the query builder entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Prefix prepended to document type names to form table names.
    #[serde(default = "default_doctype_prefix")]
    pub doctype_prefix: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            doctype_prefix: default_doctype_prefix(),
        }
    }
}

impl QueryConfig {
    /// Table name for a document type, e.g. `Comment` -> `tabComment`.
    pub fn doctype_table(&self, doctype: &str) -> String {
        format!("{}{}", self.doctype_prefix, doctype)
    }
}

fn default_doctype_prefix() -> String {
    "tab".to_string()
}
