//! The RTH consensus engine: the session state machine.
//!
//! The engine enforces the session lifecycle:
//!
//!   Pending → Collecting → Ready → Decided   (Cancelled from any non-terminal)
//!
//! The consensus invariants are absolute: a session commits at most one
//! decision, a verifier holds at most one active value per session, and no
//! finalize runs before the distinct-verifier quorum is met. This is
//! enforced structurally — mutating operations serialize through a
//! per-session lock, and every lifecycle transition goes through the
//! store's compare-and-set so exactly one writer wins even across engine
//! instances sharing a store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tracing::{debug, info, warn};

use rth_contracts::{
    command::{Command, CommandReply},
    error::{RthError, RthResult},
    event::ConsensusEvent,
    session::{
        ConsensusOutcome, Decision, EntityRef, SessionId, SessionStatus, SubmissionReceipt,
        VerificationSession,
    },
    verification::{Evidence, PhaseMatrixEntry, Verification, VerifierId},
};
use rth_policy::ConsensusPolicy;
use rth_stats::{OutlierFilter, PhaseEncoder};

use crate::traits::{Notifier, SessionStore};

/// The central engine driving verification sessions.
///
/// One engine serves the whole application: it is a stateless request
/// handler per operation, holding only the trait-object collaborators, the
/// policy, and the per-session lock table that serializes mutations.
pub struct ConsensusEngine {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    policy: ConsensusPolicy,
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ConsensusEngine {
    /// Create an engine over the given collaborators and policy.
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        policy: ConsensusPolicy,
    ) -> Self {
        Self {
            store,
            notifier,
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Dispatch one typed command to the matching operation.
    ///
    /// The single entry point for callers that route requests generically;
    /// each variant carries its own strongly-typed payload, so there is no
    /// string-keyed action dispatch anywhere in the pipeline.
    pub fn dispatch(&self, command: Command) -> RthResult<CommandReply> {
        match command {
            Command::CreateSession {
                entity,
                required_verifiers,
            } => self
                .create_session(entity, required_verifiers)
                .map(CommandReply::SessionCreated),
            Command::SubmitVerification {
                session_id,
                verifier,
                value,
                evidence,
                comments,
            } => self
                .submit(session_id, verifier, value, evidence, comments)
                .map(CommandReply::SubmissionAccepted),
            Command::Finalize { session_id } => {
                self.finalize(session_id).map(CommandReply::Finalized)
            }
            Command::Cancel { session_id, reason } => self
                .cancel(session_id, &reason)
                .map(|()| CommandReply::Cancelled { session_id }),
            Command::GetSession { session_id } => {
                self.get_session(session_id).map(CommandReply::Session)
            }
            Command::GetVerifications { session_id } => self
                .get_verifications(session_id)
                .map(CommandReply::Verifications),
            Command::GetPhaseMatrix { session_id } => self
                .get_phase_matrix(session_id)
                .map(CommandReply::PhaseMatrix),
        }
    }

    // ── Caller-facing operations ─────────────────────────────────────────────

    /// Open a new verification session for an entity.
    ///
    /// `required_verifiers = None` takes the policy default. A quorum below
    /// 2 is rejected outright: a single verifier can never constitute
    /// independent consensus. The measurement range is resolved from policy
    /// by entity kind and frozen on the session.
    pub fn create_session(
        &self,
        entity: EntityRef,
        required_verifiers: Option<u32>,
    ) -> RthResult<VerificationSession> {
        let required = required_verifiers.unwrap_or(self.policy.required_verifiers);
        if required < 2 {
            return Err(RthError::InvalidRequiredVerifiers { given: required });
        }

        let range = self.policy.range_for(&entity.kind);
        let session = VerificationSession::open(entity, range, required);
        let id = self.store.create_session(&session)?;

        info!(
            session_id = %id,
            kind = %session.entity.kind,
            required_verifiers = required,
            "verification session opened"
        );
        Ok(session)
    }

    /// Record (or replace) one verifier's measurement.
    ///
    /// # Pipeline
    ///
    /// 1. Serialize on the session lock.
    /// 2. Refuse terminal sessions (`SessionAlreadyDecided` /
    ///    `SessionCancelled`).
    /// 3. Append the row, or replace the verifier's prior row — verifiers
    ///    may correct themselves; the distinct count does not grow on
    ///    replacement and the superseded revision stays in the store's
    ///    audit history.
    /// 4. Promote `Pending → Collecting` on the first submission and
    ///    `Collecting → Ready` when the distinct count reaches quorum,
    ///    firing the quorum-reached notification exactly once.
    pub fn submit(
        &self,
        session_id: SessionId,
        verifier: VerifierId,
        value: f64,
        evidence: Evidence,
        comments: Option<String>,
    ) -> RthResult<SubmissionReceipt> {
        let lock = self.session_lock(session_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let session = self.fetch(session_id)?;
        match session.status {
            SessionStatus::Decided => {
                return Err(RthError::SessionAlreadyDecided { session_id })
            }
            SessionStatus::Cancelled => return Err(RthError::SessionCancelled { session_id }),
            _ => {}
        }

        let verification = Verification {
            session_id,
            verifier: verifier.clone(),
            value,
            evidence,
            comments,
            submitted_at: Utc::now(),
            revision: 0,
        };
        let count = self.store.append_or_replace_verification(&verification)?;

        debug!(
            session_id = %session_id,
            verifier = %verifier,
            value,
            verifier_count = count,
            "verification recorded"
        );

        if session.status == SessionStatus::Pending {
            // First submission; ignore a lost race with an external writer
            // that already promoted the session.
            self.store.compare_and_set_status(
                &session_id,
                SessionStatus::Pending,
                SessionStatus::Collecting,
            )?;
        }

        let quorum_reached = count >= session.required_verifiers;
        if quorum_reached && session.status == SessionStatus::Collecting {
            let promoted = self.store.compare_and_set_status(
                &session_id,
                SessionStatus::Collecting,
                SessionStatus::Ready,
            )?;
            if promoted {
                info!(
                    session_id = %session_id,
                    verifier_count = count,
                    required_verifiers = session.required_verifiers,
                    "quorum reached; session ready for finalize"
                );
                self.notify(ConsensusEvent::QuorumReached {
                    session_id,
                    current_count: count,
                    required_count: session.required_verifiers,
                });
            }
        }

        Ok(SubmissionReceipt {
            session_id,
            verifier_count: count,
            required_verifiers: session.required_verifiers,
            quorum_reached,
        })
    }

    /// Run the consensus computation and commit the decision.
    ///
    /// # Pipeline
    ///
    /// 1. Serialize on the session lock.
    /// 2. `Pending`/`Collecting` → `QuorumNotMet`; `Cancelled` →
    ///    `SessionCancelled`; `Decided` → return the stored outcome
    ///    unchanged (idempotent, recomputes nothing).
    /// 3. From `Ready`: encode phases over the session's frozen range, run
    ///    the outlier filter, aggregate, and apply the decision rule —
    ///    `Authorize` iff confidence meets the threshold and the filter was
    ///    not starved, else `Reject` (a valid outcome, not an error).
    /// 4. Win the `Ready → Decided` compare-and-set. The loser of a
    ///    cross-instance race re-fetches and returns the winner's stored
    ///    outcome, or `ConcurrentFinalizeLost` when that write is not yet
    ///    visible.
    /// 5. The winner persists the outcome plus the full phase matrix and
    ///    fires the decided notification (fire-and-forget).
    pub fn finalize(&self, session_id: SessionId) -> RthResult<ConsensusOutcome> {
        let lock = self.session_lock(session_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let session = self.fetch(session_id)?;
        match session.status {
            SessionStatus::Cancelled => Err(RthError::SessionCancelled { session_id }),
            SessionStatus::Decided => self.stored_outcome(session_id, session),
            SessionStatus::Pending | SessionStatus::Collecting => {
                let have = self.store.list_verifications(&session_id)?.len() as u32;
                Err(RthError::QuorumNotMet {
                    have,
                    need: session.required_verifiers,
                })
            }
            SessionStatus::Ready => {
                let verifications = self.store.list_verifications(&session_id)?;
                let (outcome, matrix) = self.compute(&session, &verifications)?;

                let won = self.store.compare_and_set_status(
                    &session_id,
                    SessionStatus::Ready,
                    SessionStatus::Decided,
                )?;
                if !won {
                    let current = self.fetch(session_id)?;
                    return match current.status {
                        SessionStatus::Decided => self.stored_outcome(session_id, current),
                        SessionStatus::Cancelled => {
                            Err(RthError::SessionCancelled { session_id })
                        }
                        // Ready is unreachable here while we hold the lock;
                        // treat anything else as the race's losing side.
                        _ => Err(RthError::ConcurrentFinalizeLost { session_id }),
                    };
                }

                self.store.persist_decision(&session_id, &outcome, &matrix)?;
                info!(
                    session_id = %session_id,
                    decision = %outcome.decision,
                    confidence = outcome.confidence,
                    outlier_detected = outcome.outlier_detected,
                    inconclusive = outcome.inconclusive,
                    "consensus decision committed"
                );

                self.notify(ConsensusEvent::Decided {
                    session_id,
                    current_count: verifications.len() as u32,
                    required_count: session.required_verifiers,
                    decision: outcome.decision,
                });
                Ok(outcome)
            }
        }
    }

    /// Administratively abort a non-terminal session.
    ///
    /// The reason is logged for audit; the data model carries no reason
    /// field. Not allowed once `Decided`, and a cancelled session cannot be
    /// cancelled again.
    pub fn cancel(&self, session_id: SessionId, reason: &str) -> RthResult<()> {
        let lock = self.session_lock(session_id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        // An external writer can move the status between read and CAS, so
        // re-read a bounded number of times rather than spinning.
        for _ in 0..3 {
            let session = self.fetch(session_id)?;
            match session.status {
                SessionStatus::Decided => {
                    return Err(RthError::SessionAlreadyDecided { session_id })
                }
                SessionStatus::Cancelled => {
                    return Err(RthError::SessionCancelled { session_id })
                }
                current => {
                    let cancelled = self.store.compare_and_set_status(
                        &session_id,
                        current,
                        SessionStatus::Cancelled,
                    )?;
                    if cancelled {
                        info!(session_id = %session_id, reason, "session cancelled");
                        return Ok(());
                    }
                }
            }
        }
        Err(RthError::StoreUnavailable {
            reason: "session status kept changing during cancel".to_string(),
        })
    }

    // ── Queries (no session lock; eventually-consistent reads) ───────────────

    /// Fetch the session row.
    pub fn get_session(&self, session_id: SessionId) -> RthResult<VerificationSession> {
        self.fetch(session_id)
    }

    /// Current verification rows, in submission order.
    pub fn get_verifications(&self, session_id: SessionId) -> RthResult<Vec<Verification>> {
        self.fetch(session_id)?;
        Ok(self.store.list_verifications(&session_id)?)
    }

    /// The persisted phase matrix. Empty before the session is decided.
    pub fn get_phase_matrix(&self, session_id: SessionId) -> RthResult<Vec<PhaseMatrixEntry>> {
        self.fetch(session_id)?;
        Ok(self.store.list_phase_matrix(&session_id)?)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// The per-session mutex mutating operations serialize on.
    fn session_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(session_id).or_default().clone()
    }

    fn fetch(&self, session_id: SessionId) -> RthResult<VerificationSession> {
        self.store
            .get_session(&session_id)?
            .ok_or(RthError::SessionNotFound { session_id })
    }

    /// The outcome of an already-decided session.
    ///
    /// A `Decided` status without a visible outcome means the winner's
    /// `persist_decision` write has not landed yet — the losing side of the
    /// finalize race surfaces that as `ConcurrentFinalizeLost` so the
    /// caller re-fetches and treats the existing decision as success.
    fn stored_outcome(
        &self,
        session_id: SessionId,
        session: VerificationSession,
    ) -> RthResult<ConsensusOutcome> {
        session
            .outcome
            .ok_or(RthError::ConcurrentFinalizeLost { session_id })
    }

    /// Pure consensus computation: encode → filter → aggregate → decide.
    fn compute(
        &self,
        session: &VerificationSession,
        verifications: &[Verification],
    ) -> RthResult<(ConsensusOutcome, Vec<PhaseMatrixEntry>)> {
        // Unreachable behind quorum gating, but checked defensively.
        if verifications.is_empty() {
            return Err(RthError::InsufficientData);
        }

        let encoder = PhaseEncoder::new(session.range);
        let phases: Vec<f64> = verifications.iter().map(|v| encoder.encode(v.value)).collect();

        let filter = OutlierFilter::new(self.policy.outlier_threshold());
        let min_retained = session.required_verifiers.saturating_sub(1) as usize;
        let filtered = filter.apply(&phases, min_retained)?;

        let confidence = filtered.aggregate.confidence();
        let decision = if confidence >= self.policy.decision_threshold && !filtered.starved {
            Decision::Authorize
        } else {
            Decision::Reject
        };

        let matrix: Vec<PhaseMatrixEntry> = verifications
            .iter()
            .zip(phases.iter().zip(&filtered.is_outlier))
            .map(|(v, (phase, flagged))| PhaseMatrixEntry {
                session_id: session.id,
                verifier: v.verifier.clone(),
                phase: *phase,
                is_outlier: *flagged,
            })
            .collect();

        let outcome = ConsensusOutcome {
            decision,
            confidence,
            mean_value: encoder.decode(filtered.aggregate.mean_phase),
            circular_variance: filtered.aggregate.variance,
            outlier_detected: filtered.outlier_detected,
            outlier_confidence: filtered.outlier_confidence,
            inconclusive: filtered.starved,
            decided_at: Utc::now(),
        };
        Ok((outcome, matrix))
    }

    fn notify(&self, event: ConsensusEvent) {
        if let Err(e) = self.notifier.notify(&event) {
            warn!(
                session_id = %event.session_id(),
                error = %e,
                "notification failed; decision state is unaffected"
            );
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
