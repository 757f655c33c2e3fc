//! Cross-source discrepancy detection.
//!
//! Compares mileage derived from trips against mileage implied by fuel
//! consumption, and (when supplied) against an independently imported
//! mileage-tracker total. Reconciliation only reports findings; it
//! never alters the totals it checked.

use fueltax_types::jurisdiction::JurisdictionCode;
use fueltax_types::summary::{Discrepancy, DiscrepancyKind, JurisdictionTotals, Severity};
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ReconcileOptions {
    /// Relative difference past which a mileage comparison is flagged.
    pub threshold: f64,

    /// Multiple of `threshold` past which a fuel-derived finding is
    /// upgraded from `warn` to `error`.
    pub severe_ratio: f64,

    /// Externally imported mileage-tracker total for the same
    /// quarter/vehicle scope, when available.
    pub tracker_miles: Option<f64>,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            threshold: 0.05,
            severe_ratio: 5.0,
            tracker_miles: None,
        }
    }
}

/// Detect material mismatches between the independently sourced
/// measures of quarterly activity.
///
/// Findings, in deterministic (kind, jurisdiction) order:
/// - fleet- and jurisdiction-level gaps between trip miles and
///   `gallons_purchased * mpg`;
/// - jurisdictions with miles but no fuel, and fuel but no miles;
/// - the tracker total versus trip miles, reported at `error` severity
///   since it is a same-unit comparison rather than a derived one.
pub fn reconcile(
    totals: &BTreeMap<JurisdictionCode, JurisdictionTotals>,
    mpg: Option<f64>,
    options: &ReconcileOptions,
) -> Vec<Discrepancy> {
    let mut findings = Vec::new();

    let trip_miles: f64 = totals.values().map(|t| t.miles_driven).sum();
    let gallons: f64 = totals.values().map(|t| t.gallons_purchased).sum();

    if let Some(mpg) = mpg {
        let estimated = gallons * mpg;
        if relative_gap(trip_miles, estimated) > options.threshold {
            findings.push(finding(
                DiscrepancyKind::FuelImpliedMileageGap,
                None,
                trip_miles,
                estimated,
                grade(relative_gap(trip_miles, estimated), options),
                format!(
                    "fleet trip miles {trip_miles} vs fuel-implied miles {estimated}"
                ),
            ));
        }
    }

    for (jurisdiction, t) in totals {
        if t.miles_driven > 0.0 && t.gallons_purchased == 0.0 {
            findings.push(finding(
                DiscrepancyKind::MilesWithoutFuel,
                Some(jurisdiction.clone()),
                t.miles_driven,
                0.0,
                Severity::Warn,
                format!(
                    "{} miles logged in {jurisdiction} with no fuel purchased there",
                    t.miles_driven
                ),
            ));
            continue;
        }

        if t.gallons_purchased > 0.0 && t.miles_driven == 0.0 {
            findings.push(finding(
                DiscrepancyKind::FuelWithoutMiles,
                Some(jurisdiction.clone()),
                0.0,
                t.gallons_purchased,
                Severity::Warn,
                format!(
                    "{} gallons purchased in {jurisdiction} with no miles logged there",
                    t.gallons_purchased
                ),
            ));
            continue;
        }

        if let Some(mpg) = mpg {
            let estimated = t.gallons_purchased * mpg;
            let gap = relative_gap(t.miles_driven, estimated);
            if gap > options.threshold {
                findings.push(finding(
                    DiscrepancyKind::FuelImpliedMileageGap,
                    Some(jurisdiction.clone()),
                    t.miles_driven,
                    estimated,
                    grade(gap, options),
                    format!(
                        "trip miles {} in {jurisdiction} vs fuel-implied miles {estimated}",
                        t.miles_driven
                    ),
                ));
            }
        }
    }

    if let Some(tracker) = options.tracker_miles {
        if relative_gap(trip_miles, tracker) > options.threshold {
            findings.push(finding(
                DiscrepancyKind::TrackerMileageGap,
                None,
                trip_miles,
                tracker,
                Severity::Error,
                format!("trip miles {trip_miles} vs imported tracker miles {tracker}"),
            ));
        }
    }

    findings.sort_by_key(stable_finding_key);
    findings
}

fn relative_gap(trip_miles: f64, other: f64) -> f64 {
    (trip_miles - other).abs() / trip_miles.max(1.0)
}

fn grade(gap: f64, options: &ReconcileOptions) -> Severity {
    if gap >= options.threshold * options.severe_ratio {
        Severity::Error
    } else {
        Severity::Warn
    }
}

fn finding(
    kind: DiscrepancyKind,
    jurisdiction: Option<JurisdictionCode>,
    expected: f64,
    actual: f64,
    severity: Severity,
    message: String,
) -> Discrepancy {
    let mut d = Discrepancy {
        id: Uuid::nil(),
        kind,
        jurisdiction,
        expected,
        actual,
        severity,
        message,
    };
    d.id = deterministic_id(&d);
    d
}

fn kind_label(kind: DiscrepancyKind) -> &'static str {
    match kind {
        DiscrepancyKind::FuelImpliedMileageGap => "fuel_implied_mileage_gap",
        DiscrepancyKind::TrackerMileageGap => "tracker_mileage_gap",
        DiscrepancyKind::MilesWithoutFuel => "miles_without_fuel",
        DiscrepancyKind::FuelWithoutMiles => "fuel_without_miles",
    }
}

fn stable_finding_key(d: &Discrepancy) -> String {
    let scope = d
        .jurisdiction
        .as_ref()
        .map(|j| j.to_string())
        .unwrap_or_else(|| "<fleet>".to_string());
    format!("{}|{}", kind_label(d.kind), scope)
}

fn deterministic_id(d: &Discrepancy) -> Uuid {
    // Deterministic ID: v5(namespace, stable_key_bytes)
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x8f, 0x21, 0xc6, 0x0e, 0x5a, 0x14, 0x47, 0x3b, 0x9d, 0x6a, 0x2e, 0x70, 0x1d, 0x94, 0x3c,
        0xa5,
    ]);

    let stable_key = format!(
        "{}|{}|{}",
        stable_finding_key(d),
        d.expected,
        d.actual
    );
    Uuid::new_v5(&NAMESPACE, stable_key.as_bytes())
}
