//! Consensus policy configuration.
//!
//! `ConsensusPolicy` holds the tunable knobs of the protocol: the default
//! quorum, the decision threshold, the outlier threshold, and the
//! per-entity-kind value ranges. It is deserialized from TOML (every field
//! optional, falling back to protocol defaults) and validated before use —
//! a malformed or out-of-bounds config is a `ConfigError`, never a panic.
//!
//! The outlier threshold is written in degrees in the file because that is
//! what humans review ("60" reads better than "1.0471975511965976"); the
//! engine consumes it in radians via [`ConsensusPolicy::outlier_threshold`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rth_contracts::error::{RthError, RthResult};
use rth_contracts::session::ValueRange;

use crate::range::RangeRule;

fn default_required_verifiers() -> u32 {
    4
}

fn default_decision_threshold() -> f64 {
    0.75
}

fn default_outlier_threshold_degrees() -> f64 {
    60.0
}

/// The full policy the engine is constructed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    /// Quorum applied when a session is created without an explicit one.
    #[serde(default = "default_required_verifiers")]
    pub required_verifiers: u32,

    /// Minimum confidence for an `Authorize` decision, in (0, 1].
    #[serde(default = "default_decision_threshold")]
    pub decision_threshold: f64,

    /// Maximum angular distance from the group before a verifier is
    /// excluded, in degrees, in (0, 180].
    #[serde(default = "default_outlier_threshold_degrees")]
    pub outlier_threshold_degrees: f64,

    /// Value-range rules, first match wins. An entity kind matched by no
    /// rule falls back to the 0–100 percent-complete range.
    #[serde(default)]
    pub ranges: Vec<RangeRule>,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            required_verifiers: default_required_verifiers(),
            decision_threshold: default_decision_threshold(),
            outlier_threshold_degrees: default_outlier_threshold_degrees(),
            ranges: Vec::new(),
        }
    }
}

impl ConsensusPolicy {
    /// Parse `s` as TOML, validate, and build a policy.
    ///
    /// Returns `RthError::ConfigError` if the TOML is malformed or any
    /// value is out of bounds.
    pub fn from_toml_str(s: &str) -> RthResult<Self> {
        let policy: ConsensusPolicy = toml::from_str(s).map_err(|e| RthError::ConfigError {
            reason: format!("failed to parse policy TOML: {}", e),
        })?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read the file at `path` and parse it as TOML policy configuration.
    pub fn from_file(path: &Path) -> RthResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| RthError::ConfigError {
            reason: format!("failed to read policy file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check every knob against its documented bounds.
    pub fn validate(&self) -> RthResult<()> {
        if self.required_verifiers < 2 {
            return Err(RthError::ConfigError {
                reason: format!(
                    "required_verifiers must be at least 2, got {}",
                    self.required_verifiers
                ),
            });
        }
        if !self.decision_threshold.is_finite()
            || self.decision_threshold <= 0.0
            || self.decision_threshold > 1.0
        {
            return Err(RthError::ConfigError {
                reason: format!(
                    "decision_threshold must be in (0, 1], got {}",
                    self.decision_threshold
                ),
            });
        }
        if !self.outlier_threshold_degrees.is_finite()
            || self.outlier_threshold_degrees <= 0.0
            || self.outlier_threshold_degrees > 180.0
        {
            return Err(RthError::ConfigError {
                reason: format!(
                    "outlier_threshold_degrees must be in (0, 180], got {}",
                    self.outlier_threshold_degrees
                ),
            });
        }
        for rule in &self.ranges {
            if !rule.range().is_valid() {
                return Err(RthError::ConfigError {
                    reason: format!(
                        "range for kind '{}' must satisfy min < max with finite bounds, got [{}, {}]",
                        rule.kind, rule.min_value, rule.max_value
                    ),
                });
            }
        }
        Ok(())
    }

    /// The outlier threshold in radians, as the filter consumes it.
    pub fn outlier_threshold(&self) -> f64 {
        self.outlier_threshold_degrees.to_radians()
    }

    /// Resolve the measurement domain for an entity kind.
    ///
    /// Rules are tested in declaration order; the first match wins. A kind
    /// matched by no rule gets the 0–100 percent-complete range.
    pub fn range_for(&self, kind: &str) -> ValueRange {
        for rule in &self.ranges {
            if rule.matches(kind) {
                debug!(kind, rule_kind = %rule.kind, "range rule matched");
                return rule.range();
            }
        }
        debug!(kind, "no range rule matched; using percent default");
        ValueRange::percent()
    }
}
