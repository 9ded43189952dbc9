//! # rth-store
//!
//! In-memory reference implementation of the RTH `SessionStore`.
//!
//! ## Overview
//!
//! [`InMemorySessionStore`] backs the engine with plain maps behind a
//! `Mutex`: current verification rows with in-place replacement, an
//! append-only submission history, compare-and-set status transitions, and
//! the persisted phase matrix. Production deployments implement the same
//! trait over a real database; this store is the semantic model they are
//! held to, and the substrate the engine's end-to-end tests run on.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rth_core::{ConsensusEngine, NoopNotifier};
//! use rth_policy::ConsensusPolicy;
//! use rth_store::InMemorySessionStore;
//!
//! let store = Arc::new(InMemorySessionStore::new());
//! let engine = ConsensusEngine::new(store, Arc::new(NoopNotifier), ConsensusPolicy::default());
//! ```

pub mod memory;

pub use memory::InMemorySessionStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
//
// Engine-against-real-store tests: the in-memory store is the semantic
// model, so the full lifecycle — including the concurrent-finalize race —
// is exercised here rather than against mocks.
