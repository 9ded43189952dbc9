//! Typed command dispatch for the engine's caller-facing surface.
//!
//! Callers drive the engine either through its named methods or through a
//! single `dispatch(Command)` entry point. The sum type replaces
//! stringly-typed `action` routing: every operation carries its own
//! strongly-typed payload and produces a matching `CommandReply` variant.

use serde::{Deserialize, Serialize};

use crate::session::{
    ConsensusOutcome, EntityRef, SessionId, SubmissionReceipt, VerificationSession,
};
use crate::verification::{Evidence, PhaseMatrixEntry, Verification, VerifierId};

/// Every operation the rest of the application may invoke on the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Command {
    /// Open a new session for an entity. `required_verifiers = None` takes
    /// the policy default.
    CreateSession {
        entity: EntityRef,
        required_verifiers: Option<u32>,
    },

    /// Record (or replace) one verifier's measurement.
    SubmitVerification {
        session_id: SessionId,
        verifier: VerifierId,
        value: f64,
        evidence: Evidence,
        comments: Option<String>,
    },

    /// Run the consensus computation and commit the decision.
    Finalize { session_id: SessionId },

    /// Administratively abort a non-terminal session.
    Cancel {
        session_id: SessionId,
        reason: String,
    },

    /// Fetch the session row.
    GetSession { session_id: SessionId },

    /// Fetch the current verification rows, in submission order.
    GetVerifications { session_id: SessionId },

    /// Fetch the persisted phase matrix (empty before `Decided`).
    GetPhaseMatrix { session_id: SessionId },
}

/// The result of a successfully dispatched `Command`.
///
/// Variants pair one-to-one with `Command` variants; errors surface as
/// `RthError`, never through a reply variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommandReply {
    SessionCreated(VerificationSession),
    SubmissionAccepted(SubmissionReceipt),
    Finalized(ConsensusOutcome),
    Cancelled { session_id: SessionId },
    Session(VerificationSession),
    Verifications(Vec<Verification>),
    PhaseMatrix(Vec<PhaseMatrixEntry>),
}
