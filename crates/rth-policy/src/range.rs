//! Value-range rules matched by entity kind.
//!
//! A `RangeRule` binds a measurement domain to an entity kind. Rules are
//! applied in declaration order — the first matching rule wins. The `kind`
//! pattern supports the special wildcard value `"*"`, which matches any
//! entity kind.
//!
//! Example in TOML:
//! ```toml
//! [[ranges]]
//! kind = "milestone-completion"
//! min_value = 0.0
//! max_value = 100.0
//! ```

use serde::{Deserialize, Serialize};

use rth_contracts::session::ValueRange;

/// One value-range rule loaded from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRule {
    /// The entity-kind pattern to match against `EntityRef::kind`.
    /// Use `"*"` to match any kind.
    pub kind: String,

    /// Inclusive lower bound of the measurement domain.
    pub min_value: f64,

    /// Inclusive upper bound of the measurement domain.
    pub max_value: f64,
}

impl RangeRule {
    /// True when this rule applies to the given entity kind.
    pub fn matches(&self, kind: &str) -> bool {
        self.kind == "*" || self.kind == kind
    }

    /// The measurement domain this rule configures.
    pub fn range(&self) -> ValueRange {
        ValueRange {
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }
}
