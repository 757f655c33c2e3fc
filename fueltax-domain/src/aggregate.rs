//! Per-jurisdiction accumulation of miles and gallons.

use fueltax_types::jurisdiction::JurisdictionCode;
use fueltax_types::record::{FuelRecord, TripRecord};
use fueltax_types::summary::JurisdictionTotals;
use std::collections::BTreeMap;
use tracing::debug;

/// Accumulate miles and gallons per jurisdiction.
///
/// When `vehicle_filter` is present, only records for that vehicle id
/// participate. Jurisdictions with no activity are never materialized,
/// so the report stays focused on jurisdictions actually touched.
///
/// Guarantees, for the filtered set:
/// - `sum(output miles_driven) == sum(trip.total_miles)` exactly
///   (every trip's total is itself the sum of its segment miles).
/// - `sum(output gallons_purchased) == sum(fuel.gallons)` exactly.
///
/// `BTreeMap` keys give the ascending jurisdiction order the summary
/// requires; iteration order is deterministic.
pub fn aggregate(
    trips: &[TripRecord],
    fuel: &[FuelRecord],
    vehicle_filter: Option<&str>,
) -> BTreeMap<JurisdictionCode, JurisdictionTotals> {
    let in_scope = |vehicle_id: &str| match vehicle_filter {
        Some(filter) => vehicle_id == filter,
        None => true,
    };

    let mut totals: BTreeMap<JurisdictionCode, JurisdictionTotals> = BTreeMap::new();

    for trip in trips.iter().filter(|t| in_scope(&t.vehicle_id)) {
        for segment in &trip.segments {
            let bucket = totals.entry(segment.jurisdiction.clone()).or_default();
            bucket.miles_driven += segment.miles;
        }
    }

    for record in fuel.iter().filter(|f| in_scope(&f.vehicle_id)) {
        let bucket = totals.entry(record.jurisdiction.clone()).or_default();
        bucket.gallons_purchased += record.gallons;
        bucket.fuel_cost += record.cost;
    }

    // A zero-mile segment or zero-gallon purchase can still materialize
    // an all-zero bucket; drop those.
    totals.retain(|_, t| t.miles_driven != 0.0 || t.gallons_purchased != 0.0 || t.fuel_cost != 0.0);

    debug!(jurisdictions = totals.len(), "aggregated jurisdiction totals");
    totals
}
