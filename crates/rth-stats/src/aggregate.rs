//! Circular aggregation: resultant vector, mean, variance, confidence.
//!
//! Each phase is treated as a unit vector on the circle. The mean resultant
//! length |R| of the averaged vectors measures agreement directly: 1 means
//! every verifier points the same way, 0 means the evidence cancels out.
//! Because the aggregate is a plain vector sum it is independent of
//! submission order, which is what makes finalize deterministic.

use std::f64::consts::TAU;

use rth_contracts::error::{RthError, RthResult};

/// Bring an angle into [0, 2π).
///
/// `rem_euclid` can round a tiny negative input up to exactly 2π, so the
/// result is folded once more to keep the interval half-open.
pub fn normalize_phase(angle: f64) -> f64 {
    let p = angle.rem_euclid(TAU);
    if p >= TAU {
        0.0
    } else {
        p
    }
}

/// Shortest-arc distance between two angles, in [0, π].
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs().rem_euclid(TAU);
    diff.min(TAU - diff)
}

/// The aggregate of a set of phases.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CircularAggregate {
    /// Circular mean, in [0, 2π).
    pub mean_phase: f64,
    /// Mean resultant length |R|, in [0, 1]. Doubles as the confidence
    /// score: scale-free, bounded, and degrades gracefully to 0 as
    /// disagreement grows.
    pub resultant_length: f64,
    /// 1 − |R|: 0 is perfect agreement, 1 maximal dispersion.
    pub variance: f64,
    /// Number of phases aggregated.
    pub sample_count: usize,
}

impl CircularAggregate {
    /// The confidence score reported to callers. Identical to |R|; no
    /// smoothing is applied.
    pub fn confidence(&self) -> f64 {
        self.resultant_length
    }
}

/// Aggregate a set of phases into resultant length, mean, and variance.
///
/// Zero phases is `InsufficientData` — unreachable behind quorum gating,
/// but checked defensively. A single phase yields confidence 1 by
/// construction; quorum rules keep single-verifier sets away from
/// decisions.
pub fn aggregate(phases: &[f64]) -> RthResult<CircularAggregate> {
    if phases.is_empty() {
        return Err(RthError::InsufficientData);
    }

    let n = phases.len() as f64;
    let sum_cos: f64 = phases.iter().map(|p| p.cos()).sum();
    let sum_sin: f64 = phases.iter().map(|p| p.sin()).sum();

    // Float drift can push the ratio a hair past 1 for tight clusters.
    let resultant_length = ((sum_cos / n).hypot(sum_sin / n)).min(1.0);
    let mean_phase = normalize_phase(sum_sin.atan2(sum_cos));

    Ok(CircularAggregate {
        mean_phase,
        resultant_length,
        variance: 1.0 - resultant_length,
        sample_count: phases.len(),
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────
