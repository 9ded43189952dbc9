//! In-memory implementation of `SessionStore`.
//!
//! `InMemorySessionStore` is the reference implementation of the
//! `SessionStore` trait. It keeps all rows in maps protected by a `Mutex`,
//! making it safe to share across threads while the engine calls its
//! methods concurrently.
//!
//! Beyond the trait surface it exposes two audit hooks:
//! `submission_history()` returns every submission ever recorded for a
//! session — including revisions later replaced — and
//! `decision_write_count()` reports how many times `persist_decision` ran
//! (exactly one for any decided session).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::info;

use rth_contracts::{
    error::StoreError,
    session::{ConsensusOutcome, SessionId, SessionStatus, VerificationSession},
    verification::{PhaseMatrixEntry, Verification},
};
use rth_core::traits::SessionStore;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of an `InMemorySessionStore`.
#[derive(Default)]
struct StoreState {
    /// Session rows by id.
    sessions: HashMap<SessionId, VerificationSession>,

    /// Current verification rows per session, in first-submission order.
    /// Replacement updates a row in place, keeping its position.
    verifications: HashMap<SessionId, Vec<Verification>>,

    /// Every submission ever recorded, in arrival order. Append-only.
    history: HashMap<SessionId, Vec<Verification>>,

    /// The persisted phase matrix per decided session.
    matrices: HashMap<SessionId, Vec<PhaseMatrixEntry>>,

    /// How many times `persist_decision` ran per session.
    decision_writes: HashMap<SessionId, u32>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// An in-memory, thread-safe session store.
///
/// # Thread safety
///
/// Every method acquires a `Mutex` internally. Clones share the same
/// underlying state, so an engine and a test can observe the same rows.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, StoreError> {
        self.state
            .lock()
            .map_err(|e| StoreError::unavailable(format!("store state lock poisoned: {}", e)))
    }

    /// Every submission ever recorded for a session, in arrival order,
    /// including revisions that were later replaced.
    pub fn submission_history(&self, id: &SessionId) -> Vec<Verification> {
        self.state
            .lock()
            .map(|state| state.history.get(id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }

    /// How many times a decision was persisted for the session. Exactly 1
    /// for any decided session; asserting on this is how tests prove the
    /// finalize race has a single winner.
    pub fn decision_write_count(&self, id: &SessionId) -> u32 {
        self.state
            .lock()
            .map(|state| *state.decision_writes.get(id).unwrap_or(&0))
            .unwrap_or(0)
    }
}

// ── SessionStore impl ─────────────────────────────────────────────────────────

impl SessionStore for InMemorySessionStore {
    fn create_session(&self, session: &VerificationSession) -> Result<SessionId, StoreError> {
        let mut state = self.locked()?;
        state.sessions.insert(session.id, session.clone());
        Ok(session.id)
    }

    fn get_session(&self, id: &SessionId) -> Result<Option<VerificationSession>, StoreError> {
        Ok(self.locked()?.sessions.get(id).cloned())
    }

    /// Record a submission, replacing the verifier's prior row in place.
    ///
    /// The superseded revision is retained in the append-only history, and
    /// the replacement keeps the row's original position so listing order
    /// stays stable across corrections.
    fn append_or_replace_verification(
        &self,
        verification: &Verification,
    ) -> Result<u32, StoreError> {
        let mut state = self.locked()?;

        let current = state
            .verifications
            .entry(verification.session_id)
            .or_default();
        let stored = match current
            .iter_mut()
            .find(|row| row.verifier == verification.verifier)
        {
            Some(existing) => {
                let replacement = Verification {
                    revision: existing.revision + 1,
                    ..verification.clone()
                };
                *existing = replacement.clone();
                replacement
            }
            None => {
                current.push(verification.clone());
                verification.clone()
            }
        };
        let count = current.len() as u32;

        state
            .history
            .entry(verification.session_id)
            .or_default()
            .push(stored);

        Ok(count)
    }

    fn compare_and_set_status(
        &self,
        id: &SessionId,
        expected: SessionStatus,
        new: SessionStatus,
    ) -> Result<bool, StoreError> {
        let mut state = self.locked()?;
        match state.sessions.get_mut(id) {
            Some(session) if session.status == expected => {
                session.status = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Persist the outcome and phase matrix for a decided session.
    ///
    /// The stored outcome is written once and never modified; the write
    /// counter exists so audits can prove exactly that.
    fn persist_decision(
        &self,
        id: &SessionId,
        outcome: &ConsensusOutcome,
        phase_matrix: &[PhaseMatrixEntry],
    ) -> Result<(), StoreError> {
        let mut state = self.locked()?;

        if let Some(session) = state.sessions.get_mut(id) {
            session.outcome = Some(outcome.clone());
        }
        state.matrices.insert(*id, phase_matrix.to_vec());
        let writes = state.decision_writes.entry(*id).or_default();
        *writes += 1;

        info!(
            session_id = %id,
            decision = %outcome.decision,
            writes = *writes,
            "decision persisted"
        );
        Ok(())
    }

    fn list_verifications(&self, id: &SessionId) -> Result<Vec<Verification>, StoreError> {
        Ok(self
            .locked()?
            .verifications
            .get(id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_phase_matrix(&self, id: &SessionId) -> Result<Vec<PhaseMatrixEntry>, StoreError> {
        Ok(self.locked()?.matrices.get(id).cloned().unwrap_or_default())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use rth_contracts::session::{
        EntityRef, SessionStatus, ValueRange, VerificationSession,
    };
    use rth_contracts::verification::{Evidence, Verification, VerifierId};
    use rth_core::traits::SessionStore;

    use super::InMemorySessionStore;

    fn session() -> VerificationSession {
        VerificationSession::open(
            EntityRef {
                kind: "milestone-completion".to_string(),
                contract_id: "contract-2024-017".to_string(),
                milestone_id: None,
            },
            ValueRange::percent(),
            4,
        )
    }

    fn submission(session: &VerificationSession, verifier: &str, value: f64) -> Verification {
        Verification {
            session_id: session.id,
            verifier: VerifierId::new(verifier),
            value,
            evidence: Evidence::none(),
            comments: None,
            submitted_at: Utc::now(),
            revision: 0,
        }
    }

    #[test]
    fn unknown_session_reads_empty() {
        let store = InMemorySessionStore::new();
        let s = session();

        assert!(store.get_session(&s.id).unwrap().is_none());
        assert!(store.list_verifications(&s.id).unwrap().is_empty());
        assert!(store.list_phase_matrix(&s.id).unwrap().is_empty());
    }

    #[test]
    fn distinct_verifiers_grow_the_count() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).unwrap();

        assert_eq!(
            store
                .append_or_replace_verification(&submission(&s, "a", 90.0))
                .unwrap(),
            1
        );
        assert_eq!(
            store
                .append_or_replace_verification(&submission(&s, "b", 92.0))
                .unwrap(),
            2
        );
    }

    #[test]
    fn replacement_keeps_count_position_and_history() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).unwrap();

        store
            .append_or_replace_verification(&submission(&s, "a", 10.0))
            .unwrap();
        store
            .append_or_replace_verification(&submission(&s, "b", 92.0))
            .unwrap();
        let count = store
            .append_or_replace_verification(&submission(&s, "a", 91.0))
            .unwrap();
        assert_eq!(count, 2, "replacement must not grow the distinct count");

        let rows = store.list_verifications(&s.id).unwrap();
        assert_eq!(rows.len(), 2);
        // Position is stable: "a" is still first.
        assert_eq!(rows[0].verifier, VerifierId::new("a"));
        assert_eq!(rows[0].value, 91.0);
        assert_eq!(rows[0].revision, 1);

        // All three submissions survive in the audit history.
        let history = store.submission_history(&s.id);
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value, 10.0);
        assert_eq!(history[2].value, 91.0);
        assert_eq!(history[2].revision, 1);
    }

    #[test]
    fn compare_and_set_requires_the_expected_status() {
        let store = InMemorySessionStore::new();
        let s = session();
        store.create_session(&s).unwrap();

        // Wrong expectation: no change.
        assert!(!store
            .compare_and_set_status(&s.id, SessionStatus::Ready, SessionStatus::Decided)
            .unwrap());
        assert_eq!(
            store.get_session(&s.id).unwrap().unwrap().status,
            SessionStatus::Pending
        );

        // Right expectation: applied.
        assert!(store
            .compare_and_set_status(&s.id, SessionStatus::Pending, SessionStatus::Collecting)
            .unwrap());
        assert_eq!(
            store.get_session(&s.id).unwrap().unwrap().status,
            SessionStatus::Collecting
        );

        // Only one of two identical transitions can win.
        assert!(store
            .compare_and_set_status(&s.id, SessionStatus::Collecting, SessionStatus::Ready)
            .unwrap());
        assert!(!store
            .compare_and_set_status(&s.id, SessionStatus::Collecting, SessionStatus::Ready)
            .unwrap());

        // Unknown session: no-op, not an error.
        let ghost = session();
        assert!(!store
            .compare_and_set_status(&ghost.id, SessionStatus::Pending, SessionStatus::Cancelled)
            .unwrap());
    }
}
