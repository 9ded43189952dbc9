//! Scenario 3: Split Panel Rejection
//!
//! Four inspectors report 10, 35, 60, and 85 percent — spread evenly
//! across the domain. There is no clear minority to exclude (dropping the
//! disagreeing phases would starve the quorum floor), so no filtering is
//! applied, confidence collapses well below the threshold, and the session
//! rejects. Rejection is a successful protocol outcome: the milestone
//! simply is not confirmed, and a new session can be opened after the
//! dispute is resolved.

use rth_contracts::error::RthResult;
use rth_contracts::session::Decision;
use rth_contracts::verification::VerifierId;

use crate::mock_data::{depot_milestone, field_evidence, split_panel};
use crate::scenarios::build_runtime;

/// Run Scenario 3: Split Panel Rejection.
pub fn run_scenario() -> RthResult<()> {
    println!("=== Scenario 3: Split Panel Rejection ===");
    println!();

    let (_store, engine) = build_runtime()?;

    let session = engine.create_session(depot_milestone(), None)?;
    println!(
        "  Session {} opened (quorum {})",
        session.id, session.required_verifiers
    );

    for report in split_panel() {
        engine.submit(
            session.id,
            VerifierId::new(report.inspector),
            report.percent_complete,
            field_evidence(&report),
            Some(report.note.to_string()),
        )?;
        println!(
            "  {} reports {:>5.1}%  \"{}\"",
            report.inspector, report.percent_complete, report.note
        );
    }

    let outcome = engine.finalize(session.id)?;

    println!();
    println!("  Decision:          {}", outcome.decision);
    println!("  Confidence:        {:.4}", outcome.confidence);
    println!("  Circular variance: {:.4}", outcome.circular_variance);
    println!("  Outliers excluded: {}", outcome.outlier_detected);
    println!("  Inconclusive:      {}", outcome.inconclusive);
    println!();

    match outcome.decision {
        Decision::Reject => {
            println!("  Evidence too dispersed — milestone not confirmed.");
            println!("  (A new session can be opened once the panel re-inspects.)");
        }
        Decision::Authorize => println!("  Unexpectedly authorized."),
    }
    println!("  Scenario 3 complete.");
    println!();
    Ok(())
}
