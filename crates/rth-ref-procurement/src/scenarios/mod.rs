//! Procurement reference scenarios.
//!
//! Each scenario is a self-contained module that wires up real RTH
//! components (policy, in-memory store, consensus engine) with mock
//! procurement data and demonstrates a distinct consensus pattern.

use std::sync::Arc;

use rth_contracts::error::{NotifyError, RthResult};
use rth_contracts::event::ConsensusEvent;
use rth_core::traits::Notifier;
use rth_core::ConsensusEngine;
use rth_policy::ConsensusPolicy;
use rth_store::InMemorySessionStore;

pub mod milestone_signoff;
pub mod rogue_verifier;
pub mod split_panel;

/// Embedded consensus policy covering the procurement scenarios.
const PROCUREMENT_POLICY: &str = include_str!("../../policies/procurement.toml");

/// A notifier that prints events to the console, standing in for the
/// application's notification fan-out.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: &ConsensusEvent) -> Result<(), NotifyError> {
        match event {
            ConsensusEvent::QuorumReached {
                current_count,
                required_count,
                ..
            } => println!(
                "  [notify] quorum reached ({current_count}/{required_count}); session is ready to finalize"
            ),
            ConsensusEvent::Decided { decision, .. } => {
                println!("  [notify] decision committed: {decision}")
            }
        }
        Ok(())
    }
}

/// Wire a fresh engine over the embedded policy and a shared in-memory
/// store. The store handle is returned alongside so scenarios can inspect
/// the audit surface afterwards.
pub fn build_runtime() -> RthResult<(Arc<InMemorySessionStore>, ConsensusEngine)> {
    let policy = ConsensusPolicy::from_toml_str(PROCUREMENT_POLICY)?;
    let store = Arc::new(InMemorySessionStore::new());
    let engine = ConsensusEngine::new(store.clone(), Arc::new(ConsoleNotifier), policy);
    Ok((store, engine))
}
