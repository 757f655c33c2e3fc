use crate::jurisdiction::JurisdictionCode;
use crate::quarter::Quarter;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fuel categories as recorded at the pump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Gasoline,
    Propane,
    Cng,
    Lng,
    Other,
}

impl FuelType {
    /// Whether purchases of this fuel participate in IFTA reconciliation.
    pub fn ifta_eligible(self) -> bool {
        matches!(self, FuelType::Diesel | FuelType::Gasoline)
    }

    /// Best-effort mapping from a free-form label; unknown labels map
    /// to [`FuelType::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "diesel" => FuelType::Diesel,
            "gasoline" | "gas" | "petrol" => FuelType::Gasoline,
            "propane" | "lpg" => FuelType::Propane,
            "cng" => FuelType::Cng,
            "lng" => FuelType::Lng,
            _ => FuelType::Other,
        }
    }
}

/// One contiguous stretch of a trip inside a single jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSegment {
    pub jurisdiction: JurisdictionCode,
    pub miles: f64,
}

/// One interstate movement attributable to a vehicle.
///
/// Invariants, enforced by the normalizer:
/// - `segments` is non-empty and ordered as driven.
/// - `total_miles` equals the sum of segment miles exactly (it is
///   recomputed from the segments during normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub id: String,
    pub vehicle_id: String,
    pub quarter: Quarter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub segments: Vec<TripSegment>,
    pub total_miles: f64,
}

/// One fuel purchase event.
///
/// Invariant, enforced by the normalizer: `gallons >= 0` and
/// `fuel_type.ifta_eligible()` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    pub id: String,
    pub vehicle_id: String,
    pub quarter: Quarter,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub jurisdiction: JurisdictionCode,
    pub gallons: f64,
    pub fuel_type: FuelType,
    pub cost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_diesel_and_gasoline_are_eligible() {
        assert!(FuelType::Diesel.ifta_eligible());
        assert!(FuelType::Gasoline.ifta_eligible());
        assert!(!FuelType::Propane.ifta_eligible());
        assert!(!FuelType::Cng.ifta_eligible());
        assert!(!FuelType::Lng.ifta_eligible());
        assert!(!FuelType::Other.ifta_eligible());
    }

    #[test]
    fn fuel_labels_map_leniently() {
        assert_eq!(FuelType::from_label(" Diesel "), FuelType::Diesel);
        assert_eq!(FuelType::from_label("GAS"), FuelType::Gasoline);
        assert_eq!(FuelType::from_label("lpg"), FuelType::Propane);
        assert_eq!(FuelType::from_label("kerosene"), FuelType::Other);
    }
}
