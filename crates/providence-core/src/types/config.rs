//! Schema construction settings, loadable from a `[schema]` TOML table.

use serde::Deserialize;

/// Default upper bound on the field count of a compact struct
pub const MAX_COMPACT_FIELDS: usize = 10;

/// Settings applied while declaring and linking types
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Maximum number of fields of a compact-eligible struct (default: 10)
    pub max_compact_fields: usize,
    /// When true, a compact request on an ineligible struct is an error;
    /// otherwise the request is dropped with a warning
    pub strict_compact: bool,
    /// Reject field names that are IDL keywords (default: true)
    pub check_reserved_names: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            max_compact_fields: MAX_COMPACT_FIELDS,
            strict_compact: false,
            check_reserved_names: true,
        }
    }
}

impl SchemaConfig {
    /// Strict mode, every compact violation is an error
    pub fn strict() -> Self {
        Self {
            strict_compact: true,
            ..Self::default()
        }
    }
}
