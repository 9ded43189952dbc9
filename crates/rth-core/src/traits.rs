//! Trait definitions for the engine's external collaborators.
//!
//! These two traits define the complete engine boundary:
//!
//! - `SessionStore` — the persistence contract (sessions, submissions,
//!   phase matrix). The engine owns no durable state of its own.
//! - `Notifier`    — the fire-and-forget event sink (quorum reached,
//!   decision committed). Never load-bearing for correctness.
//!
//! The engine reads and writes exclusively through these seams, so the
//! state machine can be driven against an in-memory store in tests and a
//! real database in production without touching consensus logic.

use rth_contracts::{
    error::{NotifyError, StoreError},
    event::ConsensusEvent,
    session::{ConsensusOutcome, SessionId, SessionStatus, VerificationSession},
    verification::{PhaseMatrixEntry, Verification},
};

/// The persistence boundary the session state machine reads and writes
/// through.
///
/// Implementations must bound every call by their configured timeout and
/// surface expiry or backend failure as `StoreError` — the engine maps it
/// to a recoverable `StoreUnavailable` and never retries, leaving the
/// session in its last durably-committed state. Verification rows are an
/// append-only audit trail: replacement keeps the superseded revision
/// recoverable, and nothing is ever deleted.
pub trait SessionStore: Send + Sync {
    /// Persist a freshly opened session and return its id.
    fn create_session(&self, session: &VerificationSession) -> Result<SessionId, StoreError>;

    /// Fetch a session row. `None` when the id is unknown — the engine
    /// turns that into `SessionNotFound`.
    fn get_session(&self, id: &SessionId) -> Result<Option<VerificationSession>, StoreError>;

    /// Record one verifier's submission.
    ///
    /// If the verifier already has a row in this session, the row is
    /// replaced in place with `revision` incremented and the superseded
    /// revision retained for audit; otherwise a new row is appended with
    /// `revision = 0`. Returns the current distinct-verifier count.
    fn append_or_replace_verification(
        &self,
        verification: &Verification,
    ) -> Result<u32, StoreError>;

    /// Atomically transition `status` from `expected` to `new`.
    ///
    /// Returns true when the transition was applied, false when the stored
    /// status no longer matched `expected`. This is the single-writer gate
    /// for every lifecycle transition; finalize in particular rides on
    /// `Ready → Decided` being won by exactly one caller.
    fn compare_and_set_status(
        &self,
        id: &SessionId,
        expected: SessionStatus,
        new: SessionStatus,
    ) -> Result<bool, StoreError>;

    /// Persist the committed outcome and the full phase matrix.
    ///
    /// Called exactly once per session, by the winner of the
    /// `Ready → Decided` transition; completes the commit that transition
    /// began. The stored outcome is immutable from then on.
    fn persist_decision(
        &self,
        id: &SessionId,
        outcome: &ConsensusOutcome,
        phase_matrix: &[PhaseMatrixEntry],
    ) -> Result<(), StoreError>;

    /// Current verification rows for a session, in submission order.
    fn list_verifications(&self, id: &SessionId) -> Result<Vec<Verification>, StoreError>;

    /// The persisted phase matrix. Empty before the session is decided.
    fn list_phase_matrix(&self, id: &SessionId) -> Result<Vec<PhaseMatrixEntry>, StoreError>;
}

/// The notification collaborator.
///
/// Informed of quorum-reached and decided events. Failures are logged by
/// the engine and dropped — a committed decision is never rolled back
/// because a notification could not be delivered.
pub trait Notifier: Send + Sync {
    /// Deliver one event. Implementations should return quickly; slow
    /// transports belong behind their own queue.
    fn notify(&self, event: &ConsensusEvent) -> Result<(), NotifyError>;
}

/// A `Notifier` that drops every event. The default collaborator for
/// deployments without a notification fan-out.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _event: &ConsensusEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}
