//! Session identity, lifecycle, and decision types.
//!
//! These types define the data flowing through the RTH consensus pipeline.
//! They are intentionally minimal — the engine owns all lifecycle logic and
//! the store treats sessions as opaque rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a single verification session.
///
/// Every engine operation targets a session identified by this UUID, which
/// appears in every store row and notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A reference to the real-world entity a session verifies.
///
/// `kind` is a discriminant string the policy layer matches value-range
/// rules against (e.g. "milestone-completion", "delivery-date"). The engine
/// never interprets it beyond that lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Discriminant selecting the policy value range for this entity type.
    pub kind: String,
    /// The contract the verified work belongs to.
    pub contract_id: String,
    /// The specific milestone under verification, when one exists.
    pub milestone_id: Option<String>,
}

/// The numeric domain a session's measurements live in.
///
/// Frozen on the session at creation so the phase matrix stays reproducible
/// from verification rows alone, regardless of later policy edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Inclusive lower bound of the measurement domain.
    pub min_value: f64,
    /// Inclusive upper bound of the measurement domain.
    pub max_value: f64,
}

impl ValueRange {
    /// The 0–100 percent-complete range most milestone checks use.
    pub fn percent() -> Self {
        Self {
            min_value: 0.0,
            max_value: 100.0,
        }
    }

    /// Width of the range. Positive for any validated range.
    pub fn span(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Check that the range is finite and non-degenerate.
    pub fn is_valid(&self) -> bool {
        self.min_value.is_finite()
            && self.max_value.is_finite()
            && self.min_value < self.max_value
    }
}

/// Lifecycle states of a verification session.
///
/// `Pending → Collecting → Ready → Decided`, with `Cancelled` reachable
/// from any non-terminal state. `Decided` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Created, no submissions yet.
    Pending,
    /// At least one submission, distinct verifier count below quorum.
    Collecting,
    /// Quorum reached; eligible for finalize.
    Ready,
    /// Finalized with a decision. Terminal.
    Decided,
    /// Administratively aborted. Terminal.
    Cancelled,
}

impl SessionStatus {
    /// True for states no further transition can leave.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Decided | SessionStatus::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Pending => "pending",
            SessionStatus::Collecting => "collecting",
            SessionStatus::Ready => "ready",
            SessionStatus::Decided => "decided",
            SessionStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// The terminal decision of a session.
///
/// `Reject` is a valid, successful protocol outcome — it is never surfaced
/// as an error by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// Confidence met the threshold: the milestone event is confirmed.
    Authorize,
    /// Evidence was too dispersed or inconclusive to confirm.
    Reject,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Authorize => f.write_str("authorize"),
            Decision::Reject => f.write_str("reject"),
        }
    }
}

/// The aggregate result a session carries once `Decided`.
///
/// Written exactly once, at finalize; immutable thereafter. Re-finalizing a
/// decided session returns this stored value unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    /// The terminal decision.
    pub decision: Decision,
    /// Mean resultant length of the authoritative aggregate, in [0, 1].
    pub confidence: f64,
    /// Circular mean decoded back into the session's value units.
    pub mean_value: f64,
    /// 1 − confidence: 0 is perfect agreement, 1 maximal dispersion.
    pub circular_variance: f64,
    /// True when the outlier filter excluded at least one verifier.
    pub outlier_detected: bool,
    /// 1 − filtered variance; present only when filtering was applied.
    pub outlier_confidence: Option<f64>,
    /// True when exclusion would have starved the quorum floor, so no
    /// filtering was applied and the decision defaulted to `Reject`.
    pub inconclusive: bool,
    /// Wall-clock time (UTC) the decision was committed.
    pub decided_at: DateTime<Utc>,
}

/// One verification round over an entity.
///
/// The store is the source of truth for these rows; the engine reads,
/// transitions, and writes them only through the `SessionStore` boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSession {
    /// Unique id of this round.
    pub id: SessionId,
    /// What is being verified.
    pub entity: EntityRef,
    /// Measurement domain, resolved from policy at creation and frozen.
    pub range: ValueRange,
    /// Distinct-verifier quorum threshold, ≥ 2, fixed at creation.
    pub required_verifiers: u32,
    /// Current lifecycle state.
    pub status: SessionStatus,
    /// Aggregate result, populated only at `Decided`.
    pub outcome: Option<ConsensusOutcome>,
    /// Wall-clock time (UTC) the session was opened.
    pub created_at: DateTime<Utc>,
}

impl VerificationSession {
    /// Open a new `Pending` session.
    ///
    /// Quorum validation happens in the engine, not here — this is a plain
    /// data constructor.
    pub fn open(entity: EntityRef, range: ValueRange, required_verifiers: u32) -> Self {
        Self {
            id: SessionId::new(),
            entity,
            range,
            required_verifiers,
            status: SessionStatus::Pending,
            outcome: None,
            created_at: Utc::now(),
        }
    }
}

/// What `submit` returns: where the session stands after the submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// The session submitted to.
    pub session_id: SessionId,
    /// Current distinct-verifier count (a resubmission does not grow this).
    pub verifier_count: u32,
    /// The session's fixed quorum threshold.
    pub required_verifiers: u32,
    /// True once the session is eligible for finalize.
    pub quorum_reached: bool,
}
