//! Raw trip and fuel inputs as handed over by the persistence
//! collaborator.
//!
//! fueltax tries hard to be *tolerant* when reading these:
//! - Unknown fields are ignored.
//! - Optional fields may be absent.
//! - Numeric fields are accepted as JSON numbers or strings.
//!
//! The normalizer is where strictness lives; these types only have to
//! carry the rows "as found" so that a bad row can be quarantined with
//! its identity intact instead of failing deserialization of the batch.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A numeric field as found in the source: either a number or a string
/// representation of one. Coercion to `f64` happens in the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTripSegment {
    #[serde(default)]
    pub jurisdiction: Option<String>,

    #[serde(default)]
    pub miles: Option<RawNumber>,
}

/// A trip row as found.
///
/// Modern rows carry `segments`; legacy rows carry only the
/// `start_jurisdiction`/`end_jurisdiction` pair plus `total_miles`,
/// from which the normalizer synthesizes a single segment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTripRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub vehicle_id: Option<String>,

    /// Quarter stamp as stored, if any. Checked against the requested
    /// quarter during normalization.
    #[serde(default)]
    pub quarter: Option<String>,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub segments: Vec<RawTripSegment>,

    #[serde(default)]
    pub start_jurisdiction: Option<String>,

    #[serde(default)]
    pub end_jurisdiction: Option<String>,

    #[serde(default)]
    pub total_miles: Option<RawNumber>,
}

/// A fuel purchase row as found.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFuelRecord {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub vehicle_id: Option<String>,

    #[serde(default)]
    pub quarter: Option<String>,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub jurisdiction: Option<String>,

    #[serde(default)]
    pub gallons: Option<RawNumber>,

    /// Free-form fuel type label, e.g. "diesel".
    #[serde(default)]
    pub fuel_type: Option<String>,

    #[serde(default)]
    pub cost: Option<RawNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_number_accepts_both_representations() {
        let n: RawNumber = serde_json::from_str("12.5").expect("number");
        assert_eq!(n, RawNumber::Number(12.5));

        let t: RawNumber = serde_json::from_str("\"12.5\"").expect("string");
        assert_eq!(t, RawNumber::Text("12.5".to_string()));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let row: RawTripRecord = serde_json::from_str(
            r#"{
                "id": "t1",
                "vehicle_id": "V1",
                "total_miles": "500",
                "legacy_ui_flag": true,
                "start_jurisdiction": "TX",
                "end_jurisdiction": "OK"
            }"#,
        )
        .expect("tolerant parse");
        assert_eq!(row.id.as_deref(), Some("t1"));
        assert!(row.segments.is_empty());
        assert_eq!(row.end_jurisdiction.as_deref(), Some("OK"));
    }
}
