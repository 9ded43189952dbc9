//! Scenario 2: Rogue Verifier Exclusion
//!
//! Three inspectors agree the milestone is ~91% complete; a fourth reports
//! 10%. The rogue phase sits more than 60° from its peers' mean, so the
//! filter excludes it, recomputes the aggregate over the remaining three,
//! and the session still authorizes — with the exclusion recorded in the
//! phase matrix for audit.

use rth_contracts::error::RthResult;
use rth_contracts::verification::VerifierId;

use crate::mock_data::{depot_milestone, field_evidence, rogue_panel};
use crate::scenarios::build_runtime;

/// Run Scenario 2: Rogue Verifier Exclusion.
pub fn run_scenario() -> RthResult<()> {
    println!("=== Scenario 2: Rogue Verifier Exclusion ===");
    println!();

    let (_store, engine) = build_runtime()?;

    let session = engine.create_session(depot_milestone(), None)?;
    println!(
        "  Session {} opened (quorum {})",
        session.id, session.required_verifiers
    );

    for report in rogue_panel() {
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
    println!("  Decision:            {}", outcome.decision);
    println!("  Confidence:          {:.4}", outcome.confidence);
    println!("  Consensus value:     {:.2}%", outcome.mean_value);
    println!("  Outliers excluded:   {}", outcome.outlier_detected);
    if let Some(oc) = outcome.outlier_confidence {
        println!("  Outlier confidence:  {:.4}", oc);
    }
    println!();

    // The phase matrix names the excluded inspector.
    let matrix = engine.get_phase_matrix(session.id)?;
    for entry in &matrix {
        println!(
            "  phase {:>6.4} rad  {}  {}",
            entry.phase,
            if entry.is_outlier { "EXCLUDED" } else { "counted " },
            entry.verifier
        );
    }

    println!();
    println!("  Scenario 2 complete.");
    println!();
    Ok(())
}
