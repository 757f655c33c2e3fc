//! The quarterly computation pipeline, composing the domain stages in
//! order.
//!
//! The entry points are I/O-agnostic: record fetching happens through
//! the port traits, and the computation itself is a pure function of
//! the fetched snapshots.

use crate::ports::{FuelSource, TripSource};
use crate::settings::ComputeSettings;
use anyhow::Context;
use fueltax_domain::{
    aggregate, build_summary, fleet_mpg, normalize, reconcile, taxable_rows, ReconcileOptions,
};
use fueltax_types::quarter::{Quarter, QuarterParseError};
use fueltax_types::raw::{RawFuelRecord, RawTripRecord};
use fueltax_types::summary::{QuarterlySummary, RejectedRecord};
use tracing::debug;

/// Error type for pipeline results. Everything per-record is
/// quarantined instead; only a malformed quarter or a failing port is
/// fatal.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid quarter: {0}")]
    InvalidQuarter(#[from] QuarterParseError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of one computation: the report plus the rows that did not
/// make it in, as non-fatal warnings for the caller.
#[derive(Debug, Clone)]
pub struct ComputeOutcome {
    pub summary: QuarterlySummary,
    pub rejected: Vec<RejectedRecord>,
}

/// Compute the quarterly summary from already-fetched snapshots.
///
/// Stages: normalize → aggregate → {mpg, taxable} → reconcile → build.
/// Pure and synchronous; never mutates a previous summary; returns a
/// fresh object per call. Identical inputs produce byte-for-byte
/// identical output.
pub fn compute_quarterly_summary(
    raw_trips: &[RawTripRecord],
    raw_fuel: &[RawFuelRecord],
    quarter: Quarter,
    settings: &ComputeSettings,
) -> ComputeOutcome {
    debug!(%quarter, vehicle_filter = ?settings.vehicle_filter, "computing quarterly summary");

    let batch = normalize(quarter, raw_trips, raw_fuel);
    let vehicle_filter = settings.vehicle_filter.as_deref();
    let totals = aggregate(&batch.trips, &batch.fuel, vehicle_filter);
    let mpg = fleet_mpg(totals.values());
    let rows = taxable_rows(&totals, mpg);

    let options = ReconcileOptions {
        threshold: settings.discrepancy_threshold,
        severe_ratio: settings.severe_ratio,
        tracker_miles: settings.tracker_miles,
    };
    let discrepancies = reconcile(&totals, mpg, &options);

    let trip_count = batch
        .trips
        .iter()
        .filter(|t| vehicle_filter.map_or(true, |v| t.vehicle_id == v))
        .count() as u64;

    let summary = build_summary(
        quarter,
        vehicle_filter,
        trip_count,
        mpg,
        rows,
        discrepancies,
    );

    ComputeOutcome {
        summary,
        rejected: batch.rejected,
    }
}

/// Fetch through the ports, then compute.
///
/// `quarter` is validated up front: a string that fails the `YYYY-Qn`
/// shape aborts before any fetch or aggregation begins.
pub fn run_quarterly(
    user_id: &str,
    quarter: &str,
    settings: &ComputeSettings,
    trips: &dyn TripSource,
    fuel: &dyn FuelSource,
) -> Result<ComputeOutcome, EngineError> {
    let quarter: Quarter = quarter.parse()?;

    let raw_trips = trips
        .fetch_trips(user_id, quarter)
        .context("fetch trips")?;
    let raw_fuel = fuel
        .fetch_fuel_entries(user_id, quarter, true)
        .context("fetch fuel entries")?;

    Ok(compute_quarterly_summary(
        &raw_trips, &raw_fuel, quarter, settings,
    ))
}
