//! Fire-and-forget notification events.
//!
//! The engine emits these to the notification collaborator at the two
//! moments the rest of the application cares about: quorum reached and
//! decision committed. Delivery failures never roll back engine state.

use serde::{Deserialize, Serialize};

use crate::session::{Decision, SessionId};

/// An event emitted by the engine to the `Notifier` collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusEvent {
    /// The distinct-verifier count reached the session's quorum.
    QuorumReached {
        session_id: SessionId,
        current_count: u32,
        required_count: u32,
    },

    /// A decision was committed for the session.
    Decided {
        session_id: SessionId,
        current_count: u32,
        required_count: u32,
        decision: Decision,
    },
}

impl ConsensusEvent {
    /// The session the event concerns.
    pub fn session_id(&self) -> SessionId {
        match self {
            ConsensusEvent::QuorumReached { session_id, .. }
            | ConsensusEvent::Decided { session_id, .. } => *session_id,
        }
    }
}
