//! # rth-contracts
//!
//! Shared types, commands, and error taxonomy for the RTH consensus engine.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions, the command sum type, and error
//! types.

pub mod command;
pub mod error;
pub mod event;
pub mod session;
pub mod verification;

#[cfg(test)]
mod tests {
    use super::*;
    use command::Command;
    use error::{RthError, StoreError};
    use session::{
        Decision, EntityRef, SessionId, SessionStatus, ValueRange, VerificationSession,
    };
    use verification::{Evidence, VerifierId};

    fn entity() -> EntityRef {
        EntityRef {
            kind: "milestone-completion".to_string(),
            contract_id: "contract-2024-017".to_string(),
            milestone_id: Some("m3".to_string()),
        }
    }

    // ── SessionId ────────────────────────────────────────────────────────────

    #[test]
    fn session_id_new_produces_unique_values() {
        let ids: Vec<SessionId> = (0..100).map(|_| SessionId::new()).collect();

        // All 100 IDs should be distinct.
        let unique: std::collections::HashSet<String> =
            ids.iter().map(|id| id.to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── SessionStatus ────────────────────────────────────────────────────────

    #[test]
    fn only_decided_and_cancelled_are_terminal() {
        assert!(!SessionStatus::Pending.is_terminal());
        assert!(!SessionStatus::Collecting.is_terminal());
        assert!(!SessionStatus::Ready.is_terminal());
        assert!(SessionStatus::Decided.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_round_trips() {
        for status in [
            SessionStatus::Pending,
            SessionStatus::Collecting,
            SessionStatus::Ready,
            SessionStatus::Decided,
            SessionStatus::Cancelled,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let decoded: SessionStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, decoded);
        }
    }

    #[test]
    fn decision_round_trips() {
        for decision in [Decision::Authorize, Decision::Reject] {
            let json = serde_json::to_string(&decision).unwrap();
            let decoded: Decision = serde_json::from_str(&json).unwrap();
            assert_eq!(decision, decoded);
        }
    }

    // ── ValueRange ───────────────────────────────────────────────────────────

    #[test]
    fn percent_range_is_valid() {
        let range = ValueRange::percent();
        assert!(range.is_valid());
        assert_eq!(range.span(), 100.0);
    }

    #[test]
    fn degenerate_and_non_finite_ranges_are_invalid() {
        let inverted = ValueRange {
            min_value: 10.0,
            max_value: 10.0,
        };
        assert!(!inverted.is_valid());

        let infinite = ValueRange {
            min_value: 0.0,
            max_value: f64::INFINITY,
        };
        assert!(!infinite.is_valid());
    }

    // ── VerificationSession ──────────────────────────────────────────────────

    #[test]
    fn open_session_starts_pending_with_no_outcome() {
        let session = VerificationSession::open(entity(), ValueRange::percent(), 4);
        assert_eq!(session.status, SessionStatus::Pending);
        assert!(session.outcome.is_none());
        assert_eq!(session.required_verifiers, 4);
    }

    // ── Command serde ────────────────────────────────────────────────────────

    #[test]
    fn submit_command_round_trips() {
        let cmd = Command::SubmitVerification {
            session_id: SessionId::new(),
            verifier: VerifierId::new("inspector-ada"),
            value: 91.0,
            evidence: Evidence(serde_json::json!({ "photos": 3 })),
            comments: Some("site walk complete".to_string()),
        };

        let json = serde_json::to_string(&cmd).unwrap();
        let decoded: Command = serde_json::from_str(&json).unwrap();

        match decoded {
            Command::SubmitVerification {
                verifier, value, ..
            } => {
                assert_eq!(verifier, VerifierId::new("inspector-ada"));
                assert_eq!(value, 91.0);
            }
            other => panic!("expected SubmitVerification, got {:?}", other),
        }
    }

    // ── RthError display messages ────────────────────────────────────────────

    #[test]
    fn error_quorum_not_met_display() {
        let err = RthError::QuorumNotMet { have: 3, need: 4 };
        let msg = err.to_string();
        assert!(msg.contains("quorum not met"));
        assert!(msg.contains('3'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn error_session_not_found_display() {
        let id = SessionId::new();
        let err = RthError::SessionNotFound { session_id: id };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn error_invalid_required_verifiers_display() {
        let err = RthError::InvalidRequiredVerifiers { given: 1 };
        let msg = err.to_string();
        assert!(msg.contains("at least 2"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn error_store_unavailable_display() {
        let err = RthError::StoreUnavailable {
            reason: "connection timed out".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("store unavailable"));
        assert!(msg.contains("connection timed out"));
    }

    #[test]
    fn store_error_converts_to_store_unavailable() {
        let err: RthError = StoreError::unavailable("lock poisoned").into();
        match err {
            RthError::StoreUnavailable { reason } => {
                assert_eq!(reason, "lock poisoned");
            }
            other => panic!("expected StoreUnavailable, got {:?}", other),
        }
    }
}
