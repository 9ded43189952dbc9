//! Scenario 1: Clean Milestone Sign-off
//!
//! Four independent inspectors report the structural-steel milestone at
//! 90, 92, 88, and 91 percent complete. The phases cluster tightly, the
//! confidence score lands near 1, and the session authorizes.
//!
//! Pipeline walk-through for the demo run:
//!   1. Session opened for contract-2024-017 / m3 with a quorum of 4
//!   2. Each submission updates the distinct-verifier count
//!   3. The fourth submission crosses quorum → session is Ready
//!   4. Finalize encodes phases, finds no outliers, aggregates
//!   5. Confidence ≥ 0.75 → AUTHORIZE, phase matrix persisted

use rth_contracts::error::RthResult;
use rth_contracts::session::Decision;
use rth_contracts::verification::VerifierId;

use crate::mock_data::{clean_signoff_panel, depot_milestone, field_evidence};
use crate::scenarios::build_runtime;

/// Run Scenario 1: Clean Milestone Sign-off.
pub fn run_scenario() -> RthResult<()> {
    println!("=== Scenario 1: Clean Milestone Sign-off ===");
    println!();

    let (store, engine) = build_runtime()?;

    let session = engine.create_session(depot_milestone(), None)?;
    println!(
        "  Session {} opened (quorum {})",
        session.id, session.required_verifiers
    );

    for report in clean_signoff_panel() {
        let receipt = engine.submit(
            session.id,
            VerifierId::new(report.inspector),
            report.percent_complete,
            field_evidence(&report),
            Some(report.note.to_string()),
        )?;
        println!(
            "  {} reports {:>5.1}%  ({}/{} verifiers)",
            report.inspector,
            report.percent_complete,
            receipt.verifier_count,
            receipt.required_verifiers
        );
    }

    let outcome = engine.finalize(session.id)?;

    println!();
    println!("  Decision:          {}", outcome.decision);
    println!("  Confidence:        {:.4}", outcome.confidence);
    println!("  Consensus value:   {:.2}%", outcome.mean_value);
    println!("  Circular variance: {:.4}", outcome.circular_variance);
    println!("  Outliers excluded: {}", outcome.outlier_detected);
    println!(
        "  Decision writes:   {}",
        store.decision_write_count(&session.id)
    );
    println!();

    match outcome.decision {
        Decision::Authorize => println!("  Milestone sign-off confirmed."),
        Decision::Reject => println!("  Milestone sign-off NOT confirmed."),
    }
    println!("  Scenario 1 complete.");
    println!();
    Ok(())
}
