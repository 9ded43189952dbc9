//! Simulated procurement data for the RTH reference scenarios.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted. This module stands in for the contract registry and the
//! inspectors' field-reporting app of a production deployment.

use serde_json::json;

use rth_contracts::session::EntityRef;
use rth_contracts::verification::Evidence;

/// One inspector's field report on a milestone.
pub struct InspectionReport {
    /// Authenticated inspector principal, as the calling edge would inject.
    pub inspector: &'static str,
    /// Reported completion, in percent of the milestone scope.
    pub percent_complete: f64,
    /// Free-text note attached to the submission.
    pub note: &'static str,
}

/// The milestone all three scenarios verify: the structural-steel stage of
/// a fictional municipal depot build.
pub fn depot_milestone() -> EntityRef {
    EntityRef {
        kind: "milestone-completion".to_string(),
        contract_id: "contract-2024-017".to_string(),
        milestone_id: Some("m3-structural-steel".to_string()),
    }
}

/// Four independent inspectors in close agreement: the steel stage is done.
pub fn clean_signoff_panel() -> Vec<InspectionReport> {
    vec![
        InspectionReport {
            inspector: "inspector-ada",
            percent_complete: 90.0,
            note: "all columns plumb, bolt-up complete on grids A-F",
        },
        InspectionReport {
            inspector: "inspector-bram",
            percent_complete: 92.0,
            note: "deck welding finished, touch-up paint outstanding",
        },
        InspectionReport {
            inspector: "inspector-chiyo",
            percent_complete: 88.0,
            note: "two secondary braces await torque certification",
        },
        InspectionReport {
            inspector: "inspector-dara",
            percent_complete: 91.0,
            note: "matches the erection drawings, snag list is minor",
        },
    ]
}

/// The same panel with one wildly divergent report — an inspector claiming
/// the stage has barely started.
pub fn rogue_panel() -> Vec<InspectionReport> {
    vec![
        InspectionReport {
            inspector: "inspector-ada",
            percent_complete: 90.0,
            note: "all columns plumb, bolt-up complete on grids A-F",
        },
        InspectionReport {
            inspector: "inspector-bram",
            percent_complete: 92.0,
            note: "deck welding finished, touch-up paint outstanding",
        },
        InspectionReport {
            inspector: "inspector-edge",
            percent_complete: 10.0,
            note: "site visit shows only foundations in place",
        },
        InspectionReport {
            inspector: "inspector-dara",
            percent_complete: 91.0,
            note: "matches the erection drawings, snag list is minor",
        },
    ]
}

/// A panel in genuine disagreement, spread across the whole domain.
pub fn split_panel() -> Vec<InspectionReport> {
    vec![
        InspectionReport {
            inspector: "inspector-ada",
            percent_complete: 10.0,
            note: "scope reading: steel package only just mobilized",
        },
        InspectionReport {
            inspector: "inspector-bram",
            percent_complete: 35.0,
            note: "columns up on the east wing, nothing west",
        },
        InspectionReport {
            inspector: "inspector-chiyo",
            percent_complete: 60.0,
            note: "primary frame complete, decking not started",
        },
        InspectionReport {
            inspector: "inspector-dara",
            percent_complete: 85.0,
            note: "near-complete per the revised drawing set",
        },
    ]
}

/// The evidence blob an inspector's reporting app would attach.
///
/// Opaque to the engine: it is carried through and stored, never
/// interpreted.
pub fn field_evidence(report: &InspectionReport) -> Evidence {
    Evidence(json!({
        "source": "field-report-app",
        "inspector": report.inspector,
        "photos_attached": 4,
        "checklist_version": "steel-v2",
        "gps_fix": true,
    }))
}
