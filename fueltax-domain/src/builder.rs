//! Final composition of the quarterly summary artifact.

use fueltax_types::quarter::Quarter;
use fueltax_types::schema;
use fueltax_types::summary::{Discrepancy, JurisdictionRow, QuarterlySummary, SummaryTotals};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Compose the report object. Pure composition: no recomputation of the
/// stage outputs, no I/O. Rows are expected in ascending jurisdiction
/// order (the aggregation map's iteration order).
///
/// The grand totals are summed from the rows themselves, so they agree
/// with the per-jurisdiction figures by construction.
pub fn build_summary(
    quarter: Quarter,
    vehicle_filter: Option<&str>,
    trip_count: u64,
    mpg: Option<f64>,
    rows: Vec<JurisdictionRow>,
    discrepancies: Vec<Discrepancy>,
) -> QuarterlySummary {
    let totals = SummaryTotals {
        trips: trip_count,
        miles: rows.iter().map(|r| r.miles_driven).sum(),
        gallons: rows.iter().map(|r| r.gallons_purchased).sum(),
        fuel_cost: rows.iter().map(|r| r.fuel_cost).sum(),
        jurisdictions: rows.len() as u64,
    };

    let mut summary = QuarterlySummary {
        schema: schema::FUELTAX_SUMMARY_V1.to_string(),
        quarter,
        vehicle_filter: vehicle_filter.map(str::to_string),
        fleet_mpg: mpg,
        per_jurisdiction: rows,
        discrepancies,
        totals,
        fingerprint: String::new(),
    };
    summary.fingerprint = fingerprint(&summary);

    debug!(
        quarter = %summary.quarter,
        jurisdictions = summary.totals.jurisdictions,
        discrepancies = summary.discrepancies.len(),
        "built quarterly summary"
    );
    summary
}

/// SHA-256 over the canonical (key-sorted) JSON of the summary payload,
/// fingerprint field excluded. Identical inputs fingerprint
/// identically, which makes the determinism property checkable from the
/// artifact alone.
fn fingerprint(summary: &QuarterlySummary) -> String {
    let mut value = serde_json::to_value(summary).unwrap_or_default();
    if let serde_json::Value::Object(ref mut map) = value {
        map.remove("fingerprint");
    }
    let canonical = canonicalize_json(&value);
    let payload = serde_json::to_string(&canonical).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hex::encode(hasher.finalize())
}

fn canonicalize_json(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut keys: Vec<_> = map.keys().cloned().collect();
            keys.sort();
            let mut out = serde_json::Map::new();
            for k in keys {
                if let Some(v) = map.get(&k) {
                    out.insert(k, canonicalize_json(v));
                }
            }
            serde_json::Value::Object(out)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize_json).collect())
        }
        other => other.clone(),
    }
}
