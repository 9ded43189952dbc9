//! Verifier submissions and the derived phase matrix.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionId;

/// Opaque, already-authenticated verifier principal.
///
/// The engine never resolves or validates identity — the calling
/// application authenticates the verifier and injects this id. Used across
/// store rows, outlier flags, and audit output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerifierId(pub String);

impl VerifierId {
    /// Construct a verifier id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for VerifierId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form supporting evidence attached to a submission.
///
/// A schema-less JSON attachment carried through the engine without
/// interpretation — the engine never branches on its contents. Validation,
/// if any, is the calling edge's concern.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence(pub serde_json::Value);

impl Evidence {
    /// The empty attachment.
    pub fn none() -> Self {
        Self(serde_json::Value::Null)
    }
}

/// One verifier's current submission for one session.
///
/// A verifier holds at most one active row per session: a repeat submission
/// replaces the value and bumps `revision`, and the superseded row is kept
/// in the store's append-only history. Rows are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verification {
    /// The session this submission belongs to.
    pub session_id: SessionId,
    /// The submitting principal, unique per session.
    pub verifier: VerifierId,
    /// Raw numeric measurement in the session's value units.
    pub value: f64,
    /// Opaque supporting evidence.
    pub evidence: Evidence,
    /// Optional free-text commentary.
    pub comments: Option<String>,
    /// Wall-clock submission time (UTC). Ordering and audit only — never
    /// used to break ties in the consensus math.
    pub submitted_at: DateTime<Utc>,
    /// 0 for the first submission, incremented on each replacement.
    pub revision: u32,
}

/// One verifier's encoded phase, materialized at finalize.
///
/// Derived, not authoritative: fully reproducible from `Verification` rows
/// plus the session's frozen value range. Persisted for audit and
/// debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMatrixEntry {
    /// The session the entry was computed for.
    pub session_id: SessionId,
    /// The verifier whose value was encoded.
    pub verifier: VerifierId,
    /// Encoded angle in radians, always in [0, 2π).
    pub phase: f64,
    /// True when the outlier filter excluded this verifier from the
    /// authoritative aggregate.
    pub is_outlier: bool,
}
