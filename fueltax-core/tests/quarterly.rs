//! Integration tests for the full pipeline as an embedder would use it.

use fueltax_core::{compute_quarterly_summary, ComputeSettings, GenerationGate, Quarter};
use fueltax_types::raw::{RawFuelRecord, RawTripRecord};
use fueltax_types::summary::RejectReason;
use pretty_assertions::assert_eq;

fn quarter() -> Quarter {
    "2025-Q1".parse().expect("quarter")
}

fn trips_json() -> Vec<RawTripRecord> {
    serde_json::from_str(
        r#"[
            {
                "id": "t1",
                "vehicle_id": "V1",
                "segments": [
                    {"jurisdiction": "tx", "miles": 500}
                ]
            },
            {
                "id": "t2",
                "vehicle_id": "V1",
                "start_jurisdiction": "TX",
                "end_jurisdiction": "OK",
                "total_miles": "300"
            },
            {
                "id": "t3",
                "vehicle_id": "V2",
                "segments": [
                    {"jurisdiction": "NM", "miles": -10}
                ]
            }
        ]"#,
    )
    .expect("trip fixtures")
}

fn fuel_json() -> Vec<RawFuelRecord> {
    serde_json::from_str(
        r#"[
            {"id": "f1", "vehicle_id": "V1", "jurisdiction": "TX", "gallons": 60, "fuel_type": "diesel", "cost": 215.4},
            {"id": "f2", "vehicle_id": "V1", "jurisdiction": "ok", "gallons": "40", "fuel_type": "diesel"},
            {"id": "f3", "vehicle_id": "V1", "jurisdiction": "TX", "gallons": 12, "fuel_type": "propane"}
        ]"#,
    )
    .expect("fuel fixtures")
}

#[test]
fn computes_the_worked_scenario_from_loose_json() {
    let outcome = compute_quarterly_summary(
        &trips_json(),
        &fuel_json(),
        quarter(),
        &ComputeSettings::for_vehicle("V1"),
    );

    // The V2 trip is quarantined (negative miles); the propane purchase
    // is quarantined (not IFTA-eligible).
    let reasons: Vec<_> = outcome.rejected.iter().map(|r| r.reason).collect();
    assert_eq!(
        reasons,
        vec![RejectReason::NegativeMiles, RejectReason::IneligibleFuelType]
    );

    let summary = &outcome.summary;
    assert_eq!(summary.fleet_mpg, Some(8.0));
    assert_eq!(summary.totals.trips, 2);
    assert_eq!(summary.totals.miles, 800.0);
    assert_eq!(summary.totals.gallons, 100.0);

    let codes: Vec<&str> = summary
        .per_jurisdiction
        .iter()
        .map(|r| r.jurisdiction.as_str())
        .collect();
    assert_eq!(codes, vec!["OK", "TX"]);

    let tx = &summary.per_jurisdiction[1];
    assert_eq!(tx.taxable_gallons, Some(62.5));
    assert_eq!(tx.gallons_due_or_credit, Some(2.5));
    assert_eq!(tx.fuel_cost, 215.4);
}

#[test]
fn repeated_computation_is_byte_identical() {
    let run = || {
        compute_quarterly_summary(
            &trips_json(),
            &fuel_json(),
            quarter(),
            &ComputeSettings::default(),
        )
    };

    let a = serde_json::to_string(&run().summary).expect("serialize");
    let b = serde_json::to_string(&run().summary).expect("serialize");
    assert_eq!(a, b);
}

#[test]
fn stale_generation_outcome_is_discarded() {
    let gate = GenerationGate::new();

    // First request starts, then the vehicle filter changes and a
    // second request supersedes it.
    let first = gate.begin();
    let second = gate.begin();

    let stale = compute_quarterly_summary(
        &trips_json(),
        &fuel_json(),
        quarter(),
        &ComputeSettings::default(),
    );
    let fresh = compute_quarterly_summary(
        &trips_json(),
        &fuel_json(),
        quarter(),
        &ComputeSettings::for_vehicle("V1"),
    );

    assert!(gate.accept(first, stale).is_none());
    let kept = gate.accept(second, fresh).expect("latest outcome kept");
    assert_eq!(kept.summary.vehicle_filter.as_deref(), Some("V1"));
}
