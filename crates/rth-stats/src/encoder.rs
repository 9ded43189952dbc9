//! Deterministic mapping between raw measurements and circle phases.
//!
//! Values near the two ends of the domain must not average toward a false
//! middle, and agreement must be measurable by resultant length — both
//! require the measurement domain to live on a circle. The encoding is
//! monotonic and total: out-of-range values are clamped (a verifier's value
//! is evidence, not a malformed request) and the clamp is logged for audit.

use std::f64::consts::TAU;

use tracing::warn;

use rth_contracts::session::ValueRange;

use crate::aggregate::normalize_phase;

/// Maps values in a fixed range onto [0, 2π) and back.
///
/// Constructed per session from the session's frozen range, so encoded
/// phases are reproducible from the verification rows alone.
#[derive(Debug, Clone, Copy)]
pub struct PhaseEncoder {
    range: ValueRange,
}

impl PhaseEncoder {
    /// Build an encoder over `range`.
    pub fn new(range: ValueRange) -> Self {
        Self { range }
    }

    /// The range this encoder maps over.
    pub fn range(&self) -> ValueRange {
        self.range
    }

    /// Encode a raw measurement as a phase in [0, 2π).
    ///
    /// `phase = 2π · clamp((value − min) / span, 0, 1)`, with a full-span
    /// value wrapping to 0 — both domain ends are the same point on the
    /// circle. Non-finite input is treated as the range minimum; like a
    /// clamp, it is logged and kept rather than rejected.
    pub fn encode(&self, value: f64) -> f64 {
        let fraction = if value.is_finite() {
            (value - self.range.min_value) / self.range.span()
        } else {
            warn!(value, "non-finite measurement treated as range minimum");
            0.0
        };

        let clamped = fraction.clamp(0.0, 1.0);
        if clamped != fraction {
            warn!(
                value,
                min = self.range.min_value,
                max = self.range.max_value,
                "out-of-range measurement clamped"
            );
        }

        normalize_phase(TAU * clamped)
    }

    /// Decode a phase back into the original value units.
    pub fn decode(&self, phase: f64) -> f64 {
        self.range.min_value + (phase / TAU) * self.range.span()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::f64::consts::{PI, TAU};

    use rth_contracts::session::ValueRange;

    use super::PhaseEncoder;

    const EPS: f64 = 1e-9;

    fn percent_encoder() -> PhaseEncoder {
        PhaseEncoder::new(ValueRange::percent())
    }

    #[test]
    fn midpoint_maps_to_pi() {
        let enc = percent_encoder();
        assert!((enc.encode(50.0) - PI).abs() < EPS);
    }

    #[test]
    fn range_ends_meet_on_the_circle() {
        let enc = percent_encoder();
        assert!(enc.encode(0.0).abs() < EPS);
        // 100% wraps to the same point as 0% — the seam, not 2π.
        assert!(enc.encode(100.0).abs() < EPS);
    }

    #[test]
    fn encoding_is_monotonic_inside_the_range() {
        let enc = percent_encoder();
        let mut last = -1.0;
        for v in [1.0, 10.0, 25.0, 50.0, 75.0, 99.0] {
            let phase = enc.encode(v);
            assert!(phase > last, "phase must grow with the value");
            last = phase;
        }
    }

    #[test]
    fn out_of_range_values_clamp_to_the_ends() {
        let enc = percent_encoder();
        assert_eq!(enc.encode(-10.0), enc.encode(0.0));
        assert_eq!(enc.encode(250.0), enc.encode(100.0));
    }

    #[test]
    fn non_finite_values_fall_to_the_range_minimum() {
        let enc = percent_encoder();
        assert_eq!(enc.encode(f64::NAN), enc.encode(0.0));
        assert_eq!(enc.encode(f64::INFINITY), enc.encode(0.0));
    }

    #[test]
    fn phases_stay_in_half_open_interval() {
        let enc = percent_encoder();
        for v in [-5.0, 0.0, 33.3, 99.999, 100.0, 140.0] {
            let phase = enc.encode(v);
            assert!((0.0..TAU).contains(&phase), "phase {} out of range", phase);
        }
    }

    #[test]
    fn decode_inverts_encode_inside_the_range() {
        let enc = percent_encoder();
        for v in [0.0, 12.5, 50.0, 87.5, 99.0] {
            let decoded = enc.decode(enc.encode(v));
            assert!((decoded - v).abs() < 1e-6, "{} decoded to {}", v, decoded);
        }
    }

    #[test]
    fn offset_ranges_encode_relative_position() {
        let enc = PhaseEncoder::new(ValueRange {
            min_value: -50.0,
            max_value: 50.0,
        });
        assert!((enc.encode(0.0) - PI).abs() < EPS);
        assert!((enc.decode(PI) - 0.0).abs() < EPS);
    }
}
