//! # rth-policy
//!
//! TOML-driven consensus policy for the RTH engine.
//!
//! ## Overview
//!
//! This crate provides [`ConsensusPolicy`]: the quorum default, decision
//! threshold, outlier threshold, and value-range rules the engine is
//! constructed with. Policies load from TOML with every field optional —
//! an empty document is the protocol defaults (quorum 4, threshold 0.75,
//! outlier cut-off 60°, percent ranges).
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use rth_policy::ConsensusPolicy;
//!
//! let policy = ConsensusPolicy::from_file(Path::new("policies/procurement.toml"))?;
//! // Pass `policy` to `rth_core::ConsensusEngine::new(...)`.
//! ```
//!
//! ## Range matching
//!
//! Each `[[ranges]]` rule specifies an entity-kind pattern supporting the
//! wildcard `"*"`. Rules are applied in declaration order; the first match
//! wins, and an unmatched kind falls back to the 0–100 percent range.

pub mod config;
pub mod range;

pub use config::ConsensusPolicy;
pub use range::RangeRule;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_3;

    use rth_contracts::error::RthError;

    use crate::ConsensusPolicy;

    // ── Defaults ──────────────────────────────────────────────────────────────

    /// An empty document is the protocol defaults.
    #[test]
    fn empty_toml_yields_protocol_defaults() {
        let policy = ConsensusPolicy::from_toml_str("").unwrap();

        assert_eq!(policy.required_verifiers, 4);
        assert_eq!(policy.decision_threshold, 0.75);
        assert_eq!(policy.outlier_threshold_degrees, 60.0);
        assert!(policy.ranges.is_empty());
    }

    #[test]
    fn outlier_threshold_converts_to_radians() {
        let policy = ConsensusPolicy::default();
        assert!((policy.outlier_threshold() - FRAC_PI_3).abs() < 1e-12);
    }

    #[test]
    fn unmatched_kind_falls_back_to_percent_range() {
        let policy = ConsensusPolicy::default();
        let range = policy.range_for("delivery-date");
        assert_eq!(range.min_value, 0.0);
        assert_eq!(range.max_value, 100.0);
    }

    // ── Range matching ────────────────────────────────────────────────────────

    #[test]
    fn first_matching_range_rule_wins() {
        let toml = r#"
            [[ranges]]
            kind = "delivery-offset-days"
            min_value = -30.0
            max_value = 30.0

            [[ranges]]
            kind = "*"
            min_value = 0.0
            max_value = 1.0
        "#;

        let policy = ConsensusPolicy::from_toml_str(toml).unwrap();

        let offset = policy.range_for("delivery-offset-days");
        assert_eq!(offset.min_value, -30.0);
        assert_eq!(offset.max_value, 30.0);

        // Anything else hits the wildcard before the percent fallback.
        let other = policy.range_for("milestone-completion");
        assert_eq!(other.max_value, 1.0);
    }

    #[test]
    fn explicit_knobs_parse() {
        let toml = r#"
            required_verifiers = 6
            decision_threshold = 0.9
            outlier_threshold_degrees = 45.0
        "#;

        let policy = ConsensusPolicy::from_toml_str(toml).unwrap();
        assert_eq!(policy.required_verifiers, 6);
        assert_eq!(policy.decision_threshold, 0.9);
        assert_eq!(policy.outlier_threshold_degrees, 45.0);
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn single_verifier_quorum_is_rejected() {
        let err = ConsensusPolicy::from_toml_str("required_verifiers = 1").unwrap_err();
        match err {
            RthError::ConfigError { reason } => {
                assert!(reason.contains("at least 2"), "unexpected reason: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn decision_threshold_out_of_bounds_is_rejected() {
        for bad in ["decision_threshold = 0.0", "decision_threshold = 1.5"] {
            assert!(matches!(
                ConsensusPolicy::from_toml_str(bad),
                Err(RthError::ConfigError { .. })
            ));
        }
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let toml = r#"
            [[ranges]]
            kind = "milestone-completion"
            min_value = 100.0
            max_value = 100.0
        "#;

        let err = ConsensusPolicy::from_toml_str(toml).unwrap_err();
        match err {
            RthError::ConfigError { reason } => {
                assert!(reason.contains("milestone-completion"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = ConsensusPolicy::from_toml_str("required_verifiers = \"four\"").unwrap_err();
        assert!(matches!(err, RthError::ConfigError { .. }));
    }
}
