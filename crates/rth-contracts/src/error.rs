//! Error taxonomy for the RTH consensus engine.
//!
//! All fallible engine operations return `RthResult<T>`. Domain-rule
//! violations are typed variants returned to the caller and never retried
//! automatically; `StoreUnavailable` is the one transient variant, safe to
//! retry with backoff at the caller's discretion. A `Reject` decision is a
//! successful outcome of the protocol and is never represented here.

use thiserror::Error;

use crate::session::SessionId;

/// The unified error type for the RTH consensus engine.
#[derive(Debug, Clone, Error)]
pub enum RthError {
    /// No session exists under the given id.
    #[error("session {session_id} not found")]
    SessionNotFound { session_id: SessionId },

    /// The session already carries a committed decision.
    #[error("session {session_id} is already decided")]
    SessionAlreadyDecided { session_id: SessionId },

    /// The session was administratively cancelled.
    #[error("session {session_id} is cancelled")]
    SessionCancelled { session_id: SessionId },

    /// Finalize was requested before the distinct-verifier quorum was met.
    #[error("quorum not met: have {have} of {need} required verifications")]
    QuorumNotMet { have: u32, need: u32 },

    /// Aggregation was asked to run over zero phases.
    ///
    /// Should be unreachable behind quorum gating, but checked defensively.
    #[error("no phases available to aggregate")]
    InsufficientData,

    /// A session was requested with a quorum below the two-verifier floor.
    #[error("required verifier count must be at least 2, got {given}")]
    InvalidRequiredVerifiers { given: u32 },

    /// The persistence collaborator timed out or failed transiently.
    ///
    /// The session remains in its last durably-committed state; the caller
    /// may retry with backoff.
    #[error("store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Lost the finalize race and the winner's decision is not yet visible.
    ///
    /// A decision exists — re-fetch the session and treat it as success.
    #[error("lost concurrent finalize for session {session_id}; a decision exists, re-fetch")]
    ConcurrentFinalizeLost { session_id: SessionId },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

/// Convenience alias used throughout the RTH crates.
pub type RthResult<T> = Result<T, RthError>;

/// Failure surfaced by a `SessionStore` implementation.
///
/// Store implementations must bound every call by their configured timeout
/// and report expiry or backend failure through this type; the engine maps
/// it to `RthError::StoreUnavailable` without retrying.
#[derive(Debug, Clone, Error)]
#[error("store unavailable: {reason}")]
pub struct StoreError {
    pub reason: String,
}

impl StoreError {
    /// Build a store failure with a human-readable reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for RthError {
    fn from(e: StoreError) -> Self {
        RthError::StoreUnavailable { reason: e.reason }
    }
}

/// Failure surfaced by a `Notifier` implementation.
///
/// Logged by the engine and dropped — notification failures never roll
/// back a committed state transition.
#[derive(Debug, Clone, Error)]
#[error("notification failed: {reason}")]
pub struct NotifyError {
    pub reason: String,
}

impl NotifyError {
    /// Build a notification failure with a human-readable reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
