//! Escaping options.

use serde::{Deserialize, Serialize};

/// Options applied by the SQL escaper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscapeConfig {
    /// Double `%` in escaped literals for drivers using `%`-style parameters.
    /// Default: false
    #[serde(default)]
    pub percent: bool,
}
