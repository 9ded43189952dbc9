//! # rth-core
//!
//! The session state machine for RTH consensus.
//!
//! This crate provides:
//! - The two trait seams (`SessionStore`, `Notifier`) the engine drives its
//!   collaborators through
//! - The `ConsensusEngine` that owns the session lifecycle and the
//!   finalize computation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rth_core::{ConsensusEngine, traits::{SessionStore, Notifier}};
//! ```

pub mod engine;
pub mod traits;

pub use engine::ConsensusEngine;
pub use traits::NoopNotifier;
