//! Record normalization: coerce and validate raw rows into canonical
//! records, quarantining bad rows instead of failing the batch.

use fueltax_types::jurisdiction::JurisdictionCode;
use fueltax_types::quarter::Quarter;
use fueltax_types::raw::{RawFuelRecord, RawNumber, RawTripRecord};
use fueltax_types::record::{FuelRecord, FuelType, TripRecord, TripSegment};
use fueltax_types::summary::{RecordSource, RejectReason, RejectedRecord};
use tracing::{debug, warn};

/// Tolerance for a stored `total_miles` disagreeing with the sum of its
/// segment miles. Anything past this is a data-entry error, not float
/// noise, and the row is quarantined.
const SEGMENT_SUM_EPSILON: f64 = 0.05;

/// Output of [`normalize`]: the rows that survived, in input order, and
/// the rows that did not, with reasons.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub trips: Vec<TripRecord>,
    pub fuel: Vec<FuelRecord>,
    pub rejected: Vec<RejectedRecord>,
}

/// Validate and canonicalize raw trip and fuel rows for `quarter`.
///
/// Pure function of its inputs. Per-row problems land in
/// `rejected`; only the offending row is lost.
pub fn normalize(
    quarter: Quarter,
    raw_trips: &[RawTripRecord],
    raw_fuel: &[RawFuelRecord],
) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();

    for raw in raw_trips {
        match normalize_trip(quarter, raw) {
            Ok(trip) => batch.trips.push(trip),
            Err(rejected) => {
                warn!(
                    record_id = rejected.record_id.as_deref().unwrap_or("-"),
                    reason = ?rejected.reason,
                    "quarantined trip row"
                );
                batch.rejected.push(rejected);
            }
        }
    }

    for raw in raw_fuel {
        match normalize_fuel(quarter, raw) {
            Ok(fuel) => batch.fuel.push(fuel),
            Err(rejected) => {
                warn!(
                    record_id = rejected.record_id.as_deref().unwrap_or("-"),
                    reason = ?rejected.reason,
                    "quarantined fuel row"
                );
                batch.rejected.push(rejected);
            }
        }
    }

    debug!(
        trips = batch.trips.len(),
        fuel = batch.fuel.len(),
        rejected = batch.rejected.len(),
        "normalized input batch"
    );
    batch
}

fn normalize_trip(quarter: Quarter, raw: &RawTripRecord) -> Result<TripRecord, RejectedRecord> {
    let reject = |reason, detail: String| RejectedRecord {
        source: RecordSource::Trip,
        record_id: raw.id.clone(),
        reason,
        detail: Some(detail),
    };

    let id = required_text(&raw.id)
        .ok_or_else(|| reject(RejectReason::MissingField, "id".to_string()))?;
    let vehicle_id = required_text(&raw.vehicle_id)
        .ok_or_else(|| reject(RejectReason::MissingField, "vehicle_id".to_string()))?;

    check_quarter_stamp(quarter, &raw.quarter)
        .map_err(|detail| reject(RejectReason::QuarterMismatch, detail))?;

    let segments = if raw.segments.is_empty() {
        synthesize_legacy_segments(raw).map_err(|(reason, detail)| reject(reason, detail))?
    } else {
        let mut segments = Vec::with_capacity(raw.segments.len());
        for (index, seg) in raw.segments.iter().enumerate() {
            let miles = coerce_number(seg.miles.as_ref())
                .map_err(|text| {
                    reject(RejectReason::NonNumericMiles, format!("segment {index}: {text}"))
                })?
                .ok_or_else(|| {
                    reject(RejectReason::NonNumericMiles, format!("segment {index}: missing"))
                })?;
            if miles < 0.0 {
                return Err(reject(
                    RejectReason::NegativeMiles,
                    format!("segment {index}: miles = {miles}"),
                ));
            }
            segments.push(TripSegment {
                jurisdiction: JurisdictionCode::normalize(seg.jurisdiction.as_deref().unwrap_or("")),
                miles,
            });
        }
        segments
    };

    if segments.is_empty() {
        return Err(reject(
            RejectReason::EmptySegments,
            "trip has no segments".to_string(),
        ));
    }

    let segment_sum: f64 = segments.iter().map(|s| s.miles).sum();

    // A stored total is only cross-checked; the canonical total is the
    // exact segment sum, which is what keeps miles conservation exact
    // downstream.
    if let Some(raw_total) = raw.total_miles.as_ref() {
        let stored = coerce_number(Some(raw_total))
            .map_err(|text| reject(RejectReason::NonNumericMiles, format!("total_miles: {text}")))?
            .unwrap_or(segment_sum);
        if stored < 0.0 {
            return Err(reject(
                RejectReason::NegativeMiles,
                format!("total_miles = {stored}"),
            ));
        }
        if (stored - segment_sum).abs() > SEGMENT_SUM_EPSILON {
            return Err(reject(
                RejectReason::SegmentSumMismatch,
                format!("total_miles {stored} != segment sum {segment_sum}"),
            ));
        }
    }

    Ok(TripRecord {
        id,
        vehicle_id,
        quarter,
        date: raw.date,
        segments,
        total_miles: segment_sum,
    })
}

/// Legacy rows carry only `(start_jurisdiction, end_jurisdiction,
/// total_miles)`. All miles are attributed to the end jurisdiction as a
/// single synthesized segment; a trip confined to one jurisdiction is
/// exactly that case.
fn synthesize_legacy_segments(
    raw: &RawTripRecord,
) -> Result<Vec<TripSegment>, (RejectReason, String)> {
    let total = match raw.total_miles.as_ref() {
        Some(value) => coerce_number(Some(value))
            .map_err(|text| (RejectReason::NonNumericMiles, format!("total_miles: {text}")))?
            .ok_or_else(|| (RejectReason::MissingField, "total_miles".to_string()))?,
        None => {
            return Err((
                RejectReason::EmptySegments,
                "trip has neither segments nor total_miles".to_string(),
            ))
        }
    };
    if total < 0.0 {
        return Err((RejectReason::NegativeMiles, format!("total_miles = {total}")));
    }

    let end = raw
        .end_jurisdiction
        .as_deref()
        .or(raw.start_jurisdiction.as_deref())
        .unwrap_or("");

    Ok(vec![TripSegment {
        jurisdiction: JurisdictionCode::normalize(end),
        miles: total,
    }])
}

fn normalize_fuel(quarter: Quarter, raw: &RawFuelRecord) -> Result<FuelRecord, RejectedRecord> {
    let reject = |reason, detail: String| RejectedRecord {
        source: RecordSource::Fuel,
        record_id: raw.id.clone(),
        reason,
        detail: Some(detail),
    };

    let id = required_text(&raw.id)
        .ok_or_else(|| reject(RejectReason::MissingField, "id".to_string()))?;
    let vehicle_id = required_text(&raw.vehicle_id)
        .ok_or_else(|| reject(RejectReason::MissingField, "vehicle_id".to_string()))?;

    check_quarter_stamp(quarter, &raw.quarter)
        .map_err(|detail| reject(RejectReason::QuarterMismatch, detail))?;

    let fuel_type = match raw.fuel_type.as_deref() {
        Some(label) => FuelType::from_label(label),
        None => FuelType::Other,
    };
    if !fuel_type.ifta_eligible() {
        return Err(reject(
            RejectReason::IneligibleFuelType,
            format!("fuel_type = {:?}", raw.fuel_type.as_deref().unwrap_or("<missing>")),
        ));
    }

    let gallons = coerce_number(raw.gallons.as_ref())
        .map_err(|text| reject(RejectReason::NonNumericGallons, text))?
        .ok_or_else(|| reject(RejectReason::MissingField, "gallons".to_string()))?;
    if gallons < 0.0 {
        return Err(reject(
            RejectReason::NegativeGallons,
            format!("gallons = {gallons}"),
        ));
    }

    let cost = coerce_number(raw.cost.as_ref())
        .map_err(|text| reject(RejectReason::NonNumericCost, text))?
        .unwrap_or(0.0);
    if cost < 0.0 {
        return Err(reject(RejectReason::NegativeCost, format!("cost = {cost}")));
    }

    Ok(FuelRecord {
        id,
        vehicle_id,
        quarter,
        date: raw.date,
        jurisdiction: JurisdictionCode::normalize(raw.jurisdiction.as_deref().unwrap_or("")),
        gallons,
        fuel_type,
        cost,
    })
}

fn required_text(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A row-level quarter stamp, when present, must match the requested
/// quarter. Records carry their quarter immutably once created.
fn check_quarter_stamp(quarter: Quarter, stamp: &Option<String>) -> Result<(), String> {
    let Some(text) = stamp.as_deref() else {
        return Ok(());
    };
    match text.parse::<Quarter>() {
        Ok(stamped) if stamped == quarter => Ok(()),
        Ok(stamped) => Err(format!("row is stamped {stamped}, requested {quarter}")),
        Err(err) => Err(format!("unparseable quarter stamp {text:?}: {err}")),
    }
}

/// Coerce a raw numeric field to a finite `f64`.
///
/// `Ok(None)` means the field was absent; `Err` carries the offending
/// text. Thousands separators in string inputs are tolerated.
fn coerce_number(raw: Option<&RawNumber>) -> Result<Option<f64>, String> {
    match raw {
        None => Ok(None),
        Some(RawNumber::Number(n)) if n.is_finite() => Ok(Some(*n)),
        Some(RawNumber::Number(n)) => Err(format!("non-finite value {n}")),
        Some(RawNumber::Text(s)) => {
            let cleaned = s.trim().replace(',', "");
            match cleaned.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Some(n)),
                _ => Err(format!("non-numeric value {s:?}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueltax_types::raw::RawTripSegment;
    use pretty_assertions::assert_eq;

    fn quarter() -> Quarter {
        "2025-Q1".parse().expect("quarter")
    }

    fn trip(id: &str, segments: Vec<(&str, f64)>) -> RawTripRecord {
        RawTripRecord {
            id: Some(id.to_string()),
            vehicle_id: Some("V1".to_string()),
            segments: segments
                .into_iter()
                .map(|(j, m)| RawTripSegment {
                    jurisdiction: Some(j.to_string()),
                    miles: Some(RawNumber::Number(m)),
                })
                .collect(),
            ..RawTripRecord::default()
        }
    }

    fn fuel(id: &str, jurisdiction: &str, gallons: RawNumber) -> RawFuelRecord {
        RawFuelRecord {
            id: Some(id.to_string()),
            vehicle_id: Some("V1".to_string()),
            jurisdiction: Some(jurisdiction.to_string()),
            gallons: Some(gallons),
            fuel_type: Some("diesel".to_string()),
            ..RawFuelRecord::default()
        }
    }

    #[test]
    fn valid_rows_pass_through() {
        let batch = normalize(
            quarter(),
            &[trip("t1", vec![("TX", 500.0), ("OK", 300.0)])],
            &[fuel("f1", "TX", RawNumber::Number(60.0))],
        );

        assert!(batch.rejected.is_empty());
        assert_eq!(batch.trips.len(), 1);
        assert_eq!(batch.trips[0].total_miles, 800.0);
        assert_eq!(batch.fuel[0].gallons, 60.0);
    }

    #[test]
    fn string_numbers_are_coerced() {
        let batch = normalize(
            quarter(),
            &[],
            &[fuel("f1", "TX", RawNumber::Text(" 1,260.5 ".to_string()))],
        );
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.fuel[0].gallons, 1260.5);
    }

    #[test]
    fn negative_and_non_numeric_values_are_quarantined() {
        let batch = normalize(
            quarter(),
            &[trip("t1", vec![("TX", -5.0)])],
            &[
                fuel("f1", "TX", RawNumber::Number(-1.0)),
                fuel("f2", "TX", RawNumber::Text("sixty".to_string())),
                fuel("f3", "TX", RawNumber::Number(f64::NAN)),
            ],
        );

        assert!(batch.trips.is_empty());
        assert!(batch.fuel.is_empty());
        let reasons: Vec<_> = batch.rejected.iter().map(|r| r.reason).collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::NegativeMiles,
                RejectReason::NegativeGallons,
                RejectReason::NonNumericGallons,
                RejectReason::NonNumericGallons,
            ]
        );
    }

    #[test]
    fn legacy_pair_synthesizes_end_jurisdiction_segment() {
        let raw = RawTripRecord {
            id: Some("t1".to_string()),
            vehicle_id: Some("V1".to_string()),
            start_jurisdiction: Some("TX".to_string()),
            end_jurisdiction: Some("OK".to_string()),
            total_miles: Some(RawNumber::Number(500.0)),
            ..RawTripRecord::default()
        };

        let batch = normalize(quarter(), &[raw], &[]);
        assert!(batch.rejected.is_empty());
        let trip = &batch.trips[0];
        assert_eq!(trip.segments.len(), 1);
        assert_eq!(trip.segments[0].jurisdiction.as_str(), "OK");
        assert_eq!(trip.segments[0].miles, 500.0);
        assert_eq!(trip.total_miles, 500.0);
    }

    #[test]
    fn blank_jurisdictions_bucket_as_unknown() {
        let mut raw = trip("t1", vec![("TX", 100.0)]);
        raw.segments[0].jurisdiction = None;

        let batch = normalize(quarter(), &[raw], &[]);
        assert!(batch.trips[0].segments[0].jurisdiction.is_unknown());
    }

    #[test]
    fn stored_total_must_agree_with_segment_sum() {
        let mut raw = trip("t1", vec![("TX", 500.0), ("OK", 300.0)]);
        raw.total_miles = Some(RawNumber::Number(900.0));

        let batch = normalize(quarter(), &[raw], &[]);
        assert!(batch.trips.is_empty());
        assert_eq!(batch.rejected[0].reason, RejectReason::SegmentSumMismatch);
    }

    #[test]
    fn trip_without_segments_or_total_is_rejected() {
        let raw = RawTripRecord {
            id: Some("t1".to_string()),
            vehicle_id: Some("V1".to_string()),
            ..RawTripRecord::default()
        };

        let batch = normalize(quarter(), &[raw], &[]);
        assert_eq!(batch.rejected[0].reason, RejectReason::EmptySegments);
    }

    #[test]
    fn wrong_quarter_stamp_is_rejected() {
        let mut raw = trip("t1", vec![("TX", 100.0)]);
        raw.quarter = Some("2024-Q4".to_string());

        let batch = normalize(quarter(), &[raw], &[]);
        assert_eq!(batch.rejected[0].reason, RejectReason::QuarterMismatch);
    }

    #[test]
    fn ineligible_fuel_is_quarantined_not_dropped() {
        let mut raw = fuel("f1", "TX", RawNumber::Number(10.0));
        raw.fuel_type = Some("propane".to_string());

        let batch = normalize(quarter(), &[], &[raw]);
        assert!(batch.fuel.is_empty());
        assert_eq!(batch.rejected[0].reason, RejectReason::IneligibleFuelType);
        assert_eq!(batch.rejected[0].record_id.as_deref(), Some("f1"));
    }

    #[test]
    fn missing_ids_are_rejected_per_row() {
        let mut bad = trip("x", vec![("TX", 10.0)]);
        bad.id = None;
        let good = trip("t2", vec![("OK", 20.0)]);

        let batch = normalize(quarter(), &[bad, good], &[]);
        assert_eq!(batch.trips.len(), 1);
        assert_eq!(batch.trips[0].id, "t2");
        assert_eq!(batch.rejected[0].reason, RejectReason::MissingField);
    }
}
