//! Angular-distance outlier exclusion.
//!
//! Filtering runs in two passes, and both results are reported:
//!
//! 1. **Flagging** — each phase is measured against the circular mean of
//!    the *remaining* phases (the self-excluded mean) and flagged when the
//!    shortest-arc distance exceeds the threshold. Measuring against the
//!    self-excluded mean keeps a single deviant from masking itself: one
//!    bad-faith submission drags the whole-group mean far enough toward
//!    itself to slip under the threshold.
//! 2. **Authoritative aggregate** — if flagged phases exist and excluding
//!    them keeps at least the quorum floor, re-aggregate over the retained
//!    set; the reported confidence and mean come from this filtered
//!    computation.
//!
//! When exclusion would starve the set below the floor, nothing is
//! excluded: the whole-group aggregate stands and the outcome is marked
//! inconclusive instead of silently discarding too much evidence. A
//! perfectly bimodal split flags both halves and therefore always starves —
//! no exclusion occurs, which is the intended conservative behavior.

use tracing::{debug, warn};

use rth_contracts::error::RthResult;

use crate::aggregate::{aggregate, angular_distance, normalize_phase, CircularAggregate};

/// The result of one filter pass over a session's phases.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// The authoritative aggregate: filtered when filtering was applied,
    /// the whole-group aggregate otherwise.
    pub aggregate: CircularAggregate,
    /// Per-input-phase exclusion flags, parallel to the input slice. All
    /// false unless filtering was actually applied.
    pub is_outlier: Vec<bool>,
    /// True when at least one phase was excluded from the authoritative
    /// aggregate.
    pub outlier_detected: bool,
    /// 1 − filtered variance; present only when filtering was applied.
    pub outlier_confidence: Option<f64>,
    /// True when exclusion would have starved the quorum floor, so the
    /// whole-group aggregate stands and the decision must default to
    /// reject.
    pub starved: bool,
}

/// Excludes phases beyond a fixed angular distance from the group.
#[derive(Debug, Clone, Copy)]
pub struct OutlierFilter {
    threshold: f64,
}

impl OutlierFilter {
    /// Build a filter with the given shortest-arc threshold in radians.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Filter `phases` and compute the authoritative aggregate.
    ///
    /// `min_retained` is the smallest set filtering may leave behind
    /// (callers pass `required_verifiers − 1`); it is floored at 1 so a
    /// filtered aggregate always has something to aggregate.
    pub fn apply(&self, phases: &[f64], min_retained: usize) -> RthResult<FilterOutcome> {
        let whole_group = aggregate(phases)?;

        // A lone phase has no peers to be measured against.
        if phases.len() < 2 {
            return Ok(FilterOutcome {
                aggregate: whole_group,
                is_outlier: vec![false; phases.len()],
                outlier_detected: false,
                outlier_confidence: None,
                starved: false,
            });
        }

        let sum_cos: f64 = phases.iter().map(|p| p.cos()).sum();
        let sum_sin: f64 = phases.iter().map(|p| p.sin()).sum();

        let flags: Vec<bool> = phases
            .iter()
            .map(|p| {
                let peer_mean =
                    normalize_phase((sum_sin - p.sin()).atan2(sum_cos - p.cos()));
                angular_distance(*p, peer_mean) > self.threshold
            })
            .collect();
        let outlier_count = flags.iter().filter(|f| **f).count();

        if outlier_count == 0 {
            debug!(
                sample_count = phases.len(),
                confidence = whole_group.resultant_length,
                "no outliers beyond threshold"
            );
            return Ok(FilterOutcome {
                aggregate: whole_group,
                is_outlier: flags,
                outlier_detected: false,
                outlier_confidence: None,
                starved: false,
            });
        }

        let retained: Vec<f64> = phases
            .iter()
            .zip(&flags)
            .filter(|(_, flagged)| !**flagged)
            .map(|(p, _)| *p)
            .collect();

        if retained.len() < min_retained.max(1) {
            // Nothing is excluded: candidates stay in the aggregate and the
            // matrix carries no outlier marks, because no exclusion happened.
            warn!(
                sample_count = phases.len(),
                candidates = outlier_count,
                min_retained,
                "outlier exclusion would starve the quorum floor; keeping all phases"
            );
            return Ok(FilterOutcome {
                aggregate: whole_group,
                is_outlier: vec![false; phases.len()],
                outlier_detected: false,
                outlier_confidence: None,
                starved: true,
            });
        }

        let filtered = aggregate(&retained)?;
        debug!(
            excluded = outlier_count,
            retained = retained.len(),
            confidence = filtered.resultant_length,
            "outliers excluded, aggregate recomputed"
        );

        Ok(FilterOutcome {
            outlier_confidence: Some(1.0 - filtered.variance),
            aggregate: filtered,
            is_outlier: flags,
            outlier_detected: true,
            starved: false,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
